use diesel::{Connection, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

#[derive(Debug)]
pub enum DatabaseError {
    ConnectionError(String),
    MigrationError(String),
    ConfigurationError(String),
}

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/");

impl std::fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatabaseError::ConnectionError(msg) => write!(f, "Connection error: {}", msg),
            DatabaseError::MigrationError(msg) => write!(f, "Migration error: {}", msg),
            DatabaseError::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for DatabaseError {}

/// Opens a fresh connection. Callers hold it for a single operation and drop
/// it afterwards, so no pool is kept.
pub fn get_database_connection(database_url: &str) -> Result<SqliteConnection, DatabaseError> {
    if database_url.trim().is_empty() {
        return Err(DatabaseError::ConfigurationError(
            "DATABASE_URL is empty".to_string(),
        ));
    }

    let mut conn = SqliteConnection::establish(database_url)
        .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

    // Concurrent requests each open their own connection.
    diesel::sql_query("PRAGMA busy_timeout = 5000")
        .execute(&mut conn)
        .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

    Ok(conn)
}

pub fn run_migrations(conn: &mut SqliteConnection) -> Result<(), DatabaseError> {
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;
    Ok(())
}

/// Creates both tables if they do not exist yet.
pub fn initialize_database(database_url: &str) -> Result<(), DatabaseError> {
    let mut conn = get_database_connection(database_url)?;
    run_migrations(&mut conn)?;
    tracing::info!("Database ready at {}", database_url);
    Ok(())
}
