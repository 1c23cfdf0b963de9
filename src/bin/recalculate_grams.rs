//! Re-derive stored alcohol grams from each drink's volume and ABV
//! Usage: cargo run --bin recalculate_grams

use std::path::PathBuf;

use lumendose::models::Drink;

fn get_database_path() -> PathBuf {
    std::env::var("LUMENDOSE_DATABASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(parent) = path.parent() {
                    if let Some(grandparent) = parent.parent() {
                        path = grandparent.to_path_buf();
                    }
                }
            }

            path.push("data");
            path.push("lumendose.db");
            path
        })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let db_path = get_database_path();
    println!("Database: {}", db_path.display());

    let database = lumendose::db::Database::new(&db_path)?;
    database.with_conn(lumendose::db::migrations::run_migrations)?;

    let corrections = database.with_conn_mut(|conn| Drink::recalculate_all_grams(conn))?;

    if corrections.is_empty() {
        println!("All drinks already match their derived alcohol grams");
        return Ok(());
    }

    for c in &corrections {
        println!(
            "Drink {}: {:.3} g -> {:.3} g ({:+.3})",
            c.id,
            c.old_grams,
            c.new_grams,
            c.new_grams - c.old_grams
        );
    }
    println!("Corrected {} drink(s)", corrections.len());

    Ok(())
}
