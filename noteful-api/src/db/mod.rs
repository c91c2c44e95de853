mod migrations;

use tokio_rusqlite::Connection;

use crate::config::config;

use migrations::MIGRATIONS;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("not_found")]
    NotFound(String),
    #[error(transparent)]
    TokioRusqlite(tokio_rusqlite::Error),
    #[error(transparent)]
    Rusqlite(rusqlite::Error),
    #[error(transparent)]
    Query(#[from] sea_query::error::Error),
}

impl Error {
    pub fn not_found_message(self, message: impl Into<String>) -> Self {
        if matches!(self, Self::NotFound(_)) {
            return Self::NotFound(message.into());
        }
        self
    }
}

impl From<tokio_rusqlite::Error> for Error {
    fn from(error: tokio_rusqlite::Error) -> Self {
        match error {
            tokio_rusqlite::Error::Rusqlite(rusqlite::Error::QueryReturnedNoRows) => Self::NotFound("Not found".into()),
            error => Self::TokioRusqlite(error),
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(error: rusqlite::Error) -> Self {
        match error {
            rusqlite::Error::QueryReturnedNoRows => Self::NotFound("Not found".into()),
            error => Self::Rusqlite(error),
        }
    }
}

pub type DB = Connection;

pub async fn init_db() -> Result<DB> {
    let database_url = &config().database_url;
    tracing::info!("opening database {database_url}");

    let conn = tokio_rusqlite::Connection::open(database_url).await?;

    conn.call(|conn| {
        conn.pragma_update(None, "journal_mode", "WAL")?;
        migrate(conn)
    })
    .await?;

    Ok(conn)
}

#[cfg(test)]
pub async fn init_test_db() -> Result<DB> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;

    conn.call(migrate).await?;

    Ok(conn)
}

fn migrate(conn: &mut rusqlite::Connection) -> tokio_rusqlite::Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")?;

    MIGRATIONS
        .to_latest(conn)
        .map_err(|e| tokio_rusqlite::Error::Other(e.into()))?;

    Ok(())
}

/// Cheap liveness probe for the heartbeat endpoint.
pub async fn ping(db: &DB) -> Result<()> {
    db.call(|conn| {
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    })
    .await?;
    Ok(())
}
