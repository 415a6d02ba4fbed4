pub mod connection;
pub mod entity;
pub mod repository;

pub use connection::establish_connection;

#[cfg(test)]
pub(crate) mod test_support {
    use sea_orm::DatabaseConnection;
    use tempfile::TempDir;

    /// Fresh on-disk SQLite store; keep the `TempDir` alive for the test's duration.
    pub async fn test_db() -> (TempDir, DatabaseConnection) {
        let dir = tempfile::tempdir().expect("tempdir");
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("survey.db").display());
        let db = super::establish_connection(&url, 1)
            .await
            .expect("test database");
        (dir, db)
    }
}
