use std::collections::HashMap;
use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Deserialize;
use tracing::instrument;

use crate::database::Database;
use crate::entities;
use crate::formatting::{DateStyle, format_datetime, format_timestamp};
use crate::services::error::DirectoryError;
use crate::validation::{ValidationError, parse_id, parse_timestamp};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShowForm {
    #[serde(default)]
    pub artist_id: String,
    #[serde(default)]
    pub venue_id: String,
    #[serde(default)]
    pub start_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowView {
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    /// RFC 3339, for machine-readable markup
    pub starts_at: String,
    pub start_time: String,
}

impl ShowView {
    /// Long form of the start time, e.g. `Sunday April, 1, 2035 at 8:00PM`.
    pub fn full_start_time(&self) -> String {
        format_datetime(&self.starts_at, DateStyle::Full).unwrap_or_else(|e| {
            tracing::warn!("Unreadable show time {:?}: {}", self.starts_at, e);
            self.start_time.clone()
        })
    }
}

pub struct ShowService {
    db: Arc<Database>,
}

impl ShowService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Every show ordered by start time, with its artist and venue.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<ShowView>, DirectoryError> {
        let rows = entities::show::Entity::find()
            .order_by_asc(entities::show::Column::StartTime)
            .find_also_related(entities::artist::Entity)
            .all(&self.db.conn)
            .await?;

        let venue_ids: Vec<i64> = rows.iter().map(|(show, _)| show.venue_id).collect();
        let venues: HashMap<i64, entities::venue::Model> = entities::venue::Entity::find()
            .filter(entities::venue::Column::Id.is_in(venue_ids))
            .all(&self.db.conn)
            .await?
            .into_iter()
            .map(|venue| (venue.id, venue))
            .collect();

        Ok(rows
            .into_iter()
            .filter_map(|(show, artist)| {
                let artist = artist?;
                let venue = venues.get(&show.venue_id)?;
                Some(ShowView {
                    venue_id: venue.id,
                    venue_name: venue.name.clone(),
                    artist_id: artist.id,
                    artist_name: artist.name,
                    artist_image_link: artist.image_link,
                    starts_at: show.start_time.to_rfc3339(),
                    start_time: format_timestamp(&show.start_time, DateStyle::Medium),
                })
            })
            .collect())
    }

    /// Inserts a show after checking that both sides exist.
    #[instrument(skip(self))]
    pub async fn create(&self, form: ShowForm) -> Result<i64, DirectoryError> {
        let id = self
            .db
            .conn
            .transaction::<_, i64, DirectoryError>(|txn| {
                Box::pin(async move {
                    let artist_id = parse_id("Artist ID", &form.artist_id)?;
                    let venue_id = parse_id("Venue ID", &form.venue_id)?;
                    let start_time = parse_timestamp(&form.start_time)?;

                    if entities::artist::Entity::find_by_id(artist_id)
                        .one(txn)
                        .await?
                        .is_none()
                    {
                        return Err(ValidationError::UnknownArtist(artist_id).into());
                    }
                    if entities::venue::Entity::find_by_id(venue_id)
                        .one(txn)
                        .await?
                        .is_none()
                    {
                        return Err(ValidationError::UnknownVenue(venue_id).into());
                    }

                    let show = entities::show::ActiveModel {
                        artist_id: Set(artist_id),
                        venue_id: Set(venue_id),
                        start_time: Set(start_time),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;

                    Ok(show.id)
                })
            })
            .await?;

        tracing::info!("Show created (ID: {})", id);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::artist::Artists;
    use crate::services::profile::ProfileService;
    use crate::services::venue::Venues;
    use crate::test_utils::{artist_form, test_db, venue_form};
    use sea_orm::PaginatorTrait;

    fn show_form(artist_id: i64, venue_id: i64, start_time: &str) -> ShowForm {
        ShowForm {
            artist_id: artist_id.to_string(),
            venue_id: venue_id.to_string(),
            start_time: start_time.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_list_shows() {
        let db = test_db().await;
        let venue = ProfileService::<Venues>::new(db.clone())
            .create(venue_form("Test Hall"))
            .await
            .unwrap();
        let artist = ProfileService::<Artists>::new(db.clone())
            .create(artist_form("Guns N Petals"))
            .await
            .unwrap();
        let service = ShowService::new(db);

        service
            .create(show_form(artist, venue, "2035-04-01 20:00:00"))
            .await
            .unwrap();
        service
            .create(show_form(artist, venue, "2019-05-21T21:30:00.000Z"))
            .await
            .unwrap();

        let shows = service.list().await.unwrap();
        assert_eq!(shows.len(), 2);
        assert_eq!(shows[0].start_time, "Tue 05, 21, 2019 9:30PM");
        assert_eq!(shows[0].venue_name, "Test Hall");
        assert_eq!(shows[0].artist_name, "Guns N Petals");
        assert_eq!(shows[1].start_time, "Sun 04, 01, 2035 8:00PM");
        assert_eq!(shows[1].starts_at, "2035-04-01T20:00:00+00:00");
        assert_eq!(shows[1].full_start_time(), "Sunday April, 1, 2035 at 8:00PM");
    }

    #[tokio::test]
    async fn test_create_requires_existing_artist_and_venue() {
        let db = test_db().await;
        let venue = ProfileService::<Venues>::new(db.clone())
            .create(venue_form("Test Hall"))
            .await
            .unwrap();
        let service = ShowService::new(db.clone());

        assert!(matches!(
            service.create(show_form(42, venue, "2035-04-01 20:00")).await,
            Err(DirectoryError::Validation(ValidationError::UnknownArtist(42)))
        ));

        let artist = ProfileService::<Artists>::new(db.clone())
            .create(artist_form("Guns N Petals"))
            .await
            .unwrap();
        assert!(matches!(
            service.create(show_form(artist, 77, "2035-04-01 20:00")).await,
            Err(DirectoryError::Validation(ValidationError::UnknownVenue(77)))
        ));

        let count = entities::show::Entity::find().count(&db.conn).await.unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_create_rejects_malformed_input() {
        let db = test_db().await;
        let service = ShowService::new(db);

        let form = ShowForm {
            artist_id: "one".into(),
            venue_id: "1".into(),
            start_time: "2035-04-01 20:00".into(),
        };
        assert!(matches!(
            service.create(form).await,
            Err(DirectoryError::Validation(ValidationError::NotANumber("Artist ID")))
        ));

        let form = ShowForm {
            artist_id: "1".into(),
            venue_id: "1".into(),
            start_time: "soon".into(),
        };
        assert!(matches!(
            service.create(form).await,
            Err(DirectoryError::Validation(ValidationError::InvalidTimestamp(_)))
        ));
    }
}
