//! Parameter binding.

use entrylite_core::{Error, Param, Result, Statement};

/// Binds `params` to the placeholders of `statement`, first parameter to
/// the first placeholder.
///
/// The list must match the statement's placeholder count exactly; an empty
/// list is valid for a statement without placeholders. Binding stops at the
/// first parameter the statement rejects, and the statement must then not
/// be executed.
pub fn bind<S: Statement>(statement: &mut S, params: &[Param]) -> Result<()> {
    let expected = statement.parameter_count();
    if expected != params.len() {
        return Err(Error::ParameterCount {
            expected,
            supplied: params.len(),
        });
    }

    for (i, param) in params.iter().enumerate() {
        statement.bind(i + 1, param)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use entrylite_core::{ErrorKind, RowStream, Value};

    /// Statement that records bindings and refuses booleans.
    struct Recording {
        placeholders: usize,
        bound: Vec<(usize, Param)>,
    }

    struct NoRows;

    impl RowStream for NoRows {
        fn next_row(&mut self) -> Result<Option<Vec<Value>>> {
            Ok(None)
        }
    }

    impl Statement for Recording {
        type Rows<'stmt> = NoRows where Self: 'stmt;

        fn parameter_count(&self) -> usize {
            self.placeholders
        }

        fn bind(&mut self, index: usize, value: &Param) -> Result<()> {
            if let Param::Boolean(_) = value {
                return Err(Error::UnsupportedParameterType {
                    index,
                    type_name: value.type_name(),
                });
            }
            self.bound.push((index, value.clone()));
            Ok(())
        }

        fn column_names(&self) -> Vec<String> {
            Vec::new()
        }

        fn execute(&mut self) -> Result<usize> {
            Ok(0)
        }

        fn query(&mut self) -> Result<NoRows> {
            Ok(NoRows)
        }
    }

    fn statement(placeholders: usize) -> Recording {
        Recording {
            placeholders,
            bound: Vec::new(),
        }
    }

    #[test]
    fn test_binds_in_order_one_based() {
        let mut stmt = statement(4);
        let params = vec![
            Param::from("Ana"),
            Param::Null,
            Param::from(i64::MIN),
            Param::from(1e-300),
        ];
        bind(&mut stmt, &params).unwrap();
        assert_eq!(
            stmt.bound,
            vec![
                (1, Param::Text("Ana".to_string())),
                (2, Param::Null),
                (3, Param::Integer(i64::MIN)),
                (4, Param::Float(1e-300)),
            ]
        );
    }

    #[test]
    fn test_empty_list_for_static_statement() {
        let mut stmt = statement(0);
        bind(&mut stmt, &[]).unwrap();
        assert!(stmt.bound.is_empty());
    }

    #[test]
    fn test_count_mismatch() {
        let mut stmt = statement(2);
        let err = bind(&mut stmt, &[Param::from(1)]).unwrap_err();
        assert!(matches!(
            err,
            Error::ParameterCount {
                expected: 2,
                supplied: 1
            }
        ));
        assert!(stmt.bound.is_empty());

        let err = bind(&mut statement(1), &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParameterCount);
    }

    #[test]
    fn test_rejection_short_circuits() {
        let mut stmt = statement(3);
        let params = vec![Param::from(1), Param::from(true), Param::from("never bound")];
        let err = bind(&mut stmt, &params).unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedParameterType {
                index: 2,
                type_name: "boolean"
            }
        ));
        assert_eq!(stmt.bound, vec![(1, Param::Integer(1))]);
    }
}
