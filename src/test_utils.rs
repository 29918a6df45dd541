use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, Set};

use crate::database::Database;
use crate::entities;
use crate::services::profile::ProfileForm;

/// In-memory database with the schema applied. A single connection keeps
/// every query on the same in-memory database.
pub async fn test_db() -> Arc<Database> {
    let database = Database::connect("sqlite::memory:", 1).await.unwrap();
    Arc::new(database)
}

pub fn venue_form(name: &str) -> ProfileForm {
    ProfileForm {
        name: name.to_string(),
        city: "Austin".to_string(),
        state: "TX".to_string(),
        address: Some("1 Main St".to_string()),
        phone: Some("512-555-0100".to_string()),
        genres: vec!["Jazz".to_string()],
        ..Default::default()
    }
}

pub fn artist_form(name: &str) -> ProfileForm {
    ProfileForm {
        name: name.to_string(),
        city: "San Francisco".to_string(),
        state: "CA".to_string(),
        phone: Some("650-253-0000".to_string()),
        genres: vec!["Rock n Roll".to_string()],
        ..Default::default()
    }
}

/// Inserts a show directly, bypassing the form checks.
pub async fn create_show(
    db: &Database,
    artist_id: i64,
    venue_id: i64,
    start_time: DateTime<Utc>,
) -> i64 {
    entities::show::ActiveModel {
        artist_id: Set(artist_id),
        venue_id: Set(venue_id),
        start_time: Set(start_time),
        ..Default::default()
    }
    .insert(&db.conn)
    .await
    .unwrap()
    .id
}
