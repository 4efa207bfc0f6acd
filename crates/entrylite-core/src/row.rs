//! Result rows.

use crate::value::Value;
use indexmap::IndexMap;

/// One result row: column name to value, in the column order reported by
/// the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    values: IndexMap<String, Value>,
}

impl Row {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pairs column names with values.
    ///
    /// A repeated column name keeps its first position and takes the later
    /// value.
    pub fn from_columns(columns: &[String], values: Vec<Value>) -> Self {
        let mut row = Row {
            values: IndexMap::with_capacity(columns.len()),
        };
        for (name, value) in columns.iter().zip(values) {
            row.insert(name.clone(), value);
        }
        row
    }

    /// Sets the value of a column.
    pub fn insert(&mut self, column: impl Into<String>, value: Value) {
        self.values.insert(column.into(), value);
    }

    /// Value of a column, if present.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    /// Column names in order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Values in column order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.values.values()
    }

    /// (column, value) pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl IntoIterator for Row {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_order_is_preserved() {
        let columns = vec!["nom".to_string(), "age".to_string(), "id".to_string()];
        let row = Row::from_columns(
            &columns,
            vec![
                Value::Text("Nejara".to_string()),
                Value::Integer(31),
                Value::Integer(1),
            ],
        );
        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["nom", "age", "id"]);
        assert_eq!(row.get("age"), Some(&Value::Integer(31)));
        assert_eq!(row.get("missing"), None);
        assert_eq!(row.len(), 3);
    }

    #[test]
    fn test_duplicate_column_keeps_first_position() {
        let columns = vec!["id".to_string(), "name".to_string(), "id".to_string()];
        let row = Row::from_columns(
            &columns,
            vec![
                Value::Integer(1),
                Value::Text("a".to_string()),
                Value::Integer(2),
            ],
        );
        assert_eq!(row.len(), 2);
        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["id", "name"]);
        assert_eq!(row.get("id"), Some(&Value::Integer(2)));
    }
}
