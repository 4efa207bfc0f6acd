use entrylite::{bootstrap, params};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Reads config/database.toml if present, otherwise db/db.db and logs/
    let app = bootstrap("config/database.toml", "info")?;
    let db = &app.executor;

    println!("=== EntryLite Employees Demo ===");
    println!("Database: {}", app.config.connection_string);
    println!("Logs:     {}\n", app.config.log_directory.display());

    db.try_execute_mutation(
        "CREATE TABLE IF NOT EXISTS employees (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            nom TEXT NOT NULL,
            prenom TEXT,
            departement TEXT,
            salaire REAL,
            statut INTEGER
        )",
        &[],
    )?;

    println!("1. Inserting...");
    let insert = "INSERT INTO employees (nom, prenom, departement, salaire, statut) VALUES (?, ?, ?, ?, ?)";
    if db.execute_insert(insert, &params!["Nejara", "Ylies", "IT", 52000.0, true]) {
        println!("   inserted");
    } else {
        println!("   insert failed, see the logs");
    }

    // Fails: nom is NOT NULL
    if !db.execute_insert(insert, &params![None::<&str>, "TEST", "IT", 0.0, false]) {
        println!("   expected failure with a NULL name");
    }

    println!("\n2. Reading through a cursor...");
    if let Some(cursor) = db.execute_query(
        "SELECT prenom, nom, departement FROM employees WHERE departement = ? AND statut = ?",
        &params!["IT", 1],
    ) {
        for row in cursor {
            println!(
                "   {} {} - {}",
                row.get("prenom").map(|v| v.to_string()).unwrap_or_default(),
                row.get("nom").map(|v| v.to_string()).unwrap_or_default(),
                row.get("departement").map(|v| v.to_string()).unwrap_or_default(),
            );
        }
    }

    println!("\n3. Reading into rows...");
    for row in db.execute_query_collect(
        "SELECT nom, prenom, salaire FROM employees WHERE salaire > ?",
        &params![50000.0],
    ) {
        let cells: Vec<String> = row.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        println!("   {}", cells.join(", "));
    }

    println!("\n4. Updating and deleting...");
    let raised = db.execute_update(
        "UPDATE employees SET salaire = ? WHERE nom = ?",
        &params![60000.0, "Nejara"],
    );
    println!("   raise applied: {}", raised);
    let removed = db.execute_delete("DELETE FROM employees WHERE nom = ?", &params!["Nejara"]);
    println!("   removed: {}", removed);

    println!("\n=== Demo Complete ===");
    Ok(())
}
