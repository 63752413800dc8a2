//! Utility to recompute the derived metrics of stored patients
//! Usage: cargo run --bin recalculate_metrics -- [file number]

use kardiyo::config::Config;
use kardiyo::db::{self, Database};
use kardiyo::sheet::SqliteSheet;
use kardiyo::store::RecordStore;
use kardiyo::tools::patients;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let only = args.get(1).map(|s| s.as_str());

    let config = Config::from_env();
    println!("Database: {}", config.database_path.display());
    println!("Sheet: {}", config.patient_sheet);

    let database = Database::new(&config.database_path)?;
    database.with_conn(|conn| db::migrations::run_migrations(conn))?;

    let store = RecordStore::new(SqliteSheet::new(database, &config.patient_sheet));
    let result = patients::recalculate_all(&store, &config.key_field, only)?;

    if result.total == 0 {
        match only {
            Some(key) => println!("No patient found with {} {}", config.key_field, key),
            None => println!("No patients found"),
        }
        return Ok(());
    }

    for patient in &result.patients {
        println!(
            "{}: BMI {:.2} -> {:.2} ({})",
            patient.key, patient.old_bmi, patient.new_bmi, patient.outcome
        );
    }
    println!("\nRecalculated {} patients", result.total);

    Ok(())
}
