use colored::*;
use futures::FutureExt;
use migration::Migrator;
use sea_orm::DatabaseConnection;
use sea_orm_migration::prelude::*;
use std::io::{self, Write};
use std::time::Instant;

const STATUS_COLUMN: usize = 80;

/// Applies every migration not yet recorded in the bookkeeping table,
/// one at a time so each gets its own status line.
pub async fn run_pending_migrations(url: &str) {
    let db = sea_orm::Database::connect(url)
        .await
        .expect("DB connection failed");

    let pending = Migrator::get_pending_migrations(&db)
        .await
        .expect("Failed to read migration state");

    if pending.is_empty() {
        println!("Schema is up to date, nothing to apply");
        return;
    }

    println!("Applying {} pending migration(s)...", pending.len());
    for migration in &pending {
        apply_next(&db, migration.name()).await;
    }
}

async fn apply_next(db: &DatabaseConnection, name: &str) {
    let label = format!("Applying {}", name.bold());
    let dots = ".".repeat(STATUS_COLUMN.saturating_sub(label.len()));
    print!("{}{} ", label, dots);
    io::stdout().flush().ok();

    let start = Instant::now();
    let result = std::panic::AssertUnwindSafe(Migrator::up(db, Some(1)))
        .catch_unwind()
        .await;

    match result {
        Ok(Ok(())) => {
            let time_str = format!("({:.2?})", start.elapsed()).dimmed();
            println!("{} {}", "done".green(), time_str);
        }
        Ok(Err(err)) => {
            println!("{} {}", "failed".red(), format!("({err})").dimmed());
            std::process::exit(1);
        }
        Err(_) => {
            println!("{}", "failed".red());
            std::process::exit(1);
        }
    }
}
