use crate::seed::{Seeder, run_seeder};
use crate::seeds::{quiz::QuizSeeder, quiz_attempt::QuizAttemptSeeder};
use migration::{Migrator, MigratorTrait};
use tracing::info;
use util::config::AppConfig;

mod seed;
mod seeds;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let _log_guard = init_logging();

    let db = db::connect().await;
    Migrator::fresh(&db)
        .await
        .expect("Failed to refresh database schema");
    info!("database schema refreshed, seeding starts");

    for (seeder, name) in [
        (Box::new(QuizSeeder) as Box<dyn Seeder + Send + Sync>, "Quiz"),
        (Box::new(QuizAttemptSeeder), "QuizAttempt"),
    ] {
        run_seeder(&*seeder, name, &db).await;
    }

    info!("seeding finished");
}

fn init_logging() -> tracing_appender::non_blocking::WorkerGuard {
    use std::fs;
    use tracing_appender::rolling;
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let (log_file, log_to_stdout) = {
        let config = AppConfig::global();
        (config.log_file.clone(), config.log_to_stdout)
    };

    fs::create_dir_all("logs").ok();

    let file_appender = rolling::daily("logs", &log_file);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true);

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_target(true)
        .with_thread_ids(true);

    let env_filter = EnvFilter::try_from_env("LOG_LEVEL")
        .unwrap_or_else(|_| EnvFilter::new("seeder=info,services=info"));

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer);

    if log_to_stdout {
        registry.with(stdout_layer).init();
    } else {
        registry.init();
    }

    guard
}
