pub mod factories;
pub mod models;
pub mod test_utils;

use sea_orm::{Database, DatabaseConnection};
use std::path::Path;
use util::config::AppConfig;

/// Connects to the database named by the application config.
///
/// `DATABASE_PATH` may be a full DSN or a bare SQLite file path; file paths
/// get their parent directory created and `mode=rwc` appended.
pub async fn connect() -> DatabaseConnection {
    let path_or_url = AppConfig::global().database_path.clone();
    // Full DSNs pass through untouched; anything else is a SQLite file path.
    let url = if path_or_url.starts_with("sqlite:")
        || path_or_url.starts_with("postgres://")
        || path_or_url.starts_with("mysql://")
    {
        path_or_url
    } else {
        // SQLite creates the file but not intermediate directories.
        if let Some(parent) = Path::new(&path_or_url).parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        format!("sqlite://{path_or_url}?mode=rwc")
    };

    Database::connect(&url)
        .await
        .expect("Failed to connect to database")
}
