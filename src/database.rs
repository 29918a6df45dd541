use color_eyre::{Result, eyre::Context};
use migration::MigratorTrait;
use sea_orm::{ConnectOptions, Database as SeaDatabase, DatabaseConnection};
use std::path::Path;
use std::time::Duration;

pub struct Database {
    pub conn: DatabaseConnection,
}

impl Database {
    /// Open or create a database at the given path
    pub async fn open(path: &Path) -> Result<Self> {
        tracing::debug!("Opening database at: {}", path.display());

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).context(format!(
                "Failed to create database directory: {}",
                parent.display()
            ))?;
        }

        let url = format!("sqlite://{}?mode=rwc", path.display());
        let database = Self::connect(&url, 10).await?;

        tracing::info!("Database ready at: {}", path.display());
        Ok(database)
    }

    /// Connect to `url` and run pending migrations.
    ///
    /// sqlx opens every pooled SQLite connection with `foreign_keys = ON`;
    /// cascading show deletes rely on that.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let mut opt = ConnectOptions::new(url.to_owned());
        opt.max_connections(max_connections)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(8))
            .acquire_timeout(Duration::from_secs(8))
            .sqlx_logging(false);

        let conn = SeaDatabase::connect(opt)
            .await
            .context(format!("Failed to open database: {url}"))?;

        tracing::debug!("Running database migrations");
        migration::Migrator::up(&conn, None)
            .await
            .context("Failed to run database migrations")?;

        Ok(Database { conn })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities;
    use crate::services::{artist::Artists, profile::ProfileService, venue::Venues};
    use crate::test_utils::{artist_form, create_show, venue_form};
    use chrono::{Duration as ChronoDuration, Utc};
    use sea_orm::{EntityTrait, PaginatorTrait, TransactionTrait};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_open_creates_file_and_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("directory.db");

        let database = Database::open(&path).await.unwrap();

        assert!(path.exists());
        let venues = entities::venue::Entity::find()
            .count(&database.conn)
            .await
            .unwrap();
        assert_eq!(venues, 0);
    }

    #[tokio::test]
    async fn test_reopen_keeps_migrations_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("directory.db");

        drop(Database::open(&path).await.unwrap());
        let database = Database::open(&path).await.unwrap();

        let shows = entities::show::Entity::find()
            .count(&database.conn)
            .await
            .unwrap();
        assert_eq!(shows, 0);
    }

    #[tokio::test]
    async fn test_every_pooled_connection_cascades() {
        let dir = tempfile::tempdir().unwrap();
        let database = Arc::new(Database::open(&dir.path().join("directory.db")).await.unwrap());
        let venues = ProfileService::<Venues>::new(database.clone());
        let artists = ProfileService::<Artists>::new(database.clone());

        let venue_id = venues.create(venue_form("The Musical Hop")).await.unwrap();
        let artist_id = artists.create(artist_form("Guns N Petals")).await.unwrap();
        create_show(&database, artist_id, venue_id, Utc::now() + ChronoDuration::days(3)).await;

        // Pin one connection so the delete runs on another
        let held = database.conn.begin().await.unwrap();
        venues.delete(venue_id).await.unwrap();
        held.rollback().await.unwrap();

        let shows = entities::show::Entity::find()
            .count(&database.conn)
            .await
            .unwrap();
        assert_eq!(shows, 0);
    }
}
