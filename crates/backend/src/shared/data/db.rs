use once_cell::sync::OnceCell;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};
use std::path::Path;

use super::schema::SCHEMA;

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

fn build_sqlite_url(path: &Path) -> String {
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    format!("sqlite://{}{}?mode=rwc", prefix, normalized)
}

/// Open the sqlite database and make sure every table exists
pub async fn initialize_database(db_file: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if db_file.is_absolute() {
        db_file.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_file)
    };
    let db_url = build_sqlite_url(&absolute_path);
    tracing::info!("Opening database: {}", absolute_path.display());

    let mut options = ConnectOptions::new(db_url);
    options.sqlx_logging(false);
    let conn = Database::connect(options).await?;

    apply_schema(&conn).await?;

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Database connection already initialized"))?;
    Ok(())
}

/// Create missing tables and indexes (idempotent)
pub async fn apply_schema(conn: &DatabaseConnection) -> anyhow::Result<()> {
    for (idx, sql) in SCHEMA.iter().enumerate() {
        conn.execute(Statement::from_string(DatabaseBackend::Sqlite, sql.to_string()))
            .await
            .map_err(|e| anyhow::anyhow!("Schema statement #{} failed: {}", idx, e))?;
    }
    tracing::info!("Database schema is up to date ({} statements)", SCHEMA.len());
    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database connection has not been initialized")
}

/// Database-backed tests share one runtime and one temp-file database,
/// since the connection pool is global and bound to the runtime it was
/// opened on.
#[cfg(test)]
pub mod test_support {
    use once_cell::sync::Lazy;
    use std::future::Future;
    use tokio::runtime::Runtime;

    static RUNTIME: Lazy<Runtime> = Lazy::new(|| {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .expect("test runtime");
        let path = std::env::temp_dir().join(format!("backend-test-{}.db", uuid::Uuid::new_v4()));
        runtime
            .block_on(super::initialize_database(&path))
            .expect("test database");
        runtime
    });

    /// Run an async test body with the database initialized
    pub fn with_database<F: Future>(body: F) -> F::Output {
        RUNTIME.block_on(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_url() {
        assert_eq!(
            build_sqlite_url(Path::new("/var/lib/app.db")),
            "sqlite:///var/lib/app.db?mode=rwc"
        );
        assert_eq!(
            build_sqlite_url(Path::new("C:\\data\\app.db")),
            "sqlite:///C:/data/app.db?mode=rwc"
        );
    }

    #[tokio::test]
    async fn test_schema_applies_twice() {
        let conn = Database::connect("sqlite::memory:").await.unwrap();
        apply_schema(&conn).await.unwrap();
        apply_schema(&conn).await.unwrap();
    }
}
