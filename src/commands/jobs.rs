//! Jobs command - the OTP e-mail queue.
//!
//! - `work`: run the e-mail worker until Ctrl+C
//! - `list`: print job counts by status
//! - `clear`: delete failed jobs

use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, QueryResult, Statement};

use crate::cli::args::{JobsAction, JobsArgs};
use crate::config::{Config, JOB_NAME_EMAIL, JOB_POOL_MAX_CONNECTIONS};
use crate::errors::{AppError, AppResult};

const SCHEMA_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM information_schema.schemata \
     WHERE schema_name = 'apalis') AS exists";

const COUNT_BY_STATUS_SQL: &str =
    "SELECT status::text AS status, COUNT(*)::bigint AS count FROM apalis.jobs GROUP BY status";

const CLEAR_FAILED_SQL: &str = "DELETE FROM apalis.jobs WHERE status = 'Failed'";

pub async fn execute(args: JobsArgs, config: Config) -> AppResult<()> {
    match args.action {
        JobsAction::Work => run_worker(&config).await,
        JobsAction::List => list_jobs(&config).await,
        JobsAction::Clear => clear_failed_jobs(&config).await,
    }
}

/// Deliver queued e-mails from the apalis PostgreSQL storage.
async fn run_worker(config: &Config) -> AppResult<()> {
    use apalis::prelude::*;
    use apalis_sql::postgres::PostgresStorage;
    use apalis_sql::sqlx::postgres::PgPoolOptions;

    use crate::jobs::{email_job_handler, EmailJob};

    let pool = PgPoolOptions::new()
        .max_connections(JOB_POOL_MAX_CONNECTIONS)
        .connect(&config.database.url)
        .await
        .map_err(|e| AppError::internal(format!("Failed to connect to database: {}", e)))?;

    PostgresStorage::setup(&pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to setup job storage: {}", e)))?;

    let email_storage: PostgresStorage<EmailJob> = PostgresStorage::new(pool);
    let worker = WorkerBuilder::new(JOB_NAME_EMAIL)
        .backend(email_storage)
        .build_fn(email_job_handler);

    tracing::info!(queue = JOB_NAME_EMAIL, "Job worker started. Press Ctrl+C to stop.");

    tokio::select! {
        result = Monitor::new().register(worker).run() => {
            if let Err(e) = result {
                tracing::error!("Worker error: {}", e);
                return Err(AppError::internal(format!("Worker failed: {}", e)));
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping worker...");
        }
    }

    tracing::info!("Job worker stopped");
    Ok(())
}

/// Job counts per apalis status.
#[derive(Debug, Default, PartialEq, Eq)]
struct JobCounts {
    pending: i64,
    running: i64,
    failed: i64,
    done: i64,
}

impl JobCounts {
    fn record(&mut self, status: &str, count: i64) {
        match status {
            "Pending" => self.pending = count,
            "Running" => self.running = count,
            "Failed" => self.failed = count,
            "Done" => self.done = count,
            other => tracing::debug!(status = other, count, "Ignoring job status"),
        }
    }
}

async fn connect(config: &Config) -> AppResult<DatabaseConnection> {
    sea_orm::Database::connect(&config.database.url)
        .await
        .map_err(|e| AppError::internal(format!("Failed to connect to database: {}", e)))
}

fn statement(sql: &str) -> Statement {
    Statement::from_string(DatabaseBackend::Postgres, sql.to_string())
}

/// The apalis tables only exist once a worker has run.
async fn queue_initialized(db: &DatabaseConnection) -> AppResult<bool> {
    let row: Option<QueryResult> = db.query_one(statement(SCHEMA_EXISTS_SQL)).await?;
    Ok(row
        .and_then(|r| r.try_get::<bool>("", "exists").ok())
        .unwrap_or(false))
}

async fn list_jobs(config: &Config) -> AppResult<()> {
    let db = connect(config).await?;
    if !queue_initialized(&db).await? {
        println!("Job queue not initialized. Run 'jobs work' first to create the queue tables.");
        return Ok(());
    }

    let mut counts = JobCounts::default();
    for row in db.query_all(statement(COUNT_BY_STATUS_SQL)).await? {
        if let (Ok(status), Ok(count)) = (
            row.try_get::<String>("", "status"),
            row.try_get::<i64>("", "count"),
        ) {
            counts.record(&status, count);
        }
    }

    println!("\n=== Job Queue Status ===");
    println!("Pending:  {}", counts.pending);
    println!("Running:  {}", counts.running);
    println!("Failed:   {}", counts.failed);
    println!("Done:     {}", counts.done);
    println!("========================\n");

    Ok(())
}

async fn clear_failed_jobs(config: &Config) -> AppResult<()> {
    let db = connect(config).await?;
    if !queue_initialized(&db).await? {
        println!("Job queue not initialized. Nothing to clear.");
        return Ok(());
    }

    let result = db.execute(statement(CLEAR_FAILED_SQL)).await?;
    tracing::info!(cleared = result.rows_affected(), "Failed jobs cleared");
    println!("Cleared {} failed job(s) from the queue.", result.rows_affected());

    Ok(())
}
