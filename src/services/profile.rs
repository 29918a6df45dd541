use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};
use serde::Deserialize;
use tracing::instrument;

use crate::choices;
use crate::database::Database;
use crate::services::error::DirectoryError;
use crate::services::listing::{
    Booking, BookingView, LocationGroup, ProfileSummary, count_upcoming, group_by_location,
    partition_bookings,
};
use crate::validation::{ValidationError, optional, required, validate_phone};

/// Describes one kind of directory profile (venue or artist) to the shared
/// list/search/detail/create/edit/delete flow.
#[async_trait]
pub trait Profile: Send + Sync + 'static {
    /// Singular label used in notices, e.g. `Venue`
    const KIND: &'static str;
    /// Path segment of the profile pages, e.g. `venues`
    const COLLECTION: &'static str;
    /// Path segment of the pages linked from this profile's shows
    const COUNTERPART_COLLECTION: &'static str;
    /// Form field carrying the seeking checkbox
    const SEEKING_FIELD: &'static str;
    const SEEKING_LABEL: &'static str;
    const REQUIRES_ADDRESS: bool;

    /// Every profile, ordered by name.
    async fn all(db: &DatabaseConnection) -> Result<Vec<ProfileView>, DbErr>;

    async fn find(db: &DatabaseConnection, id: i64) -> Result<Option<ProfileView>, DbErr>;

    /// `(profile_id, start_time)` for every show of this kind of profile.
    async fn show_times(db: &DatabaseConnection) -> Result<Vec<(i64, DateTime<Utc>)>, DbErr>;

    /// Shows of one profile joined with their counterpart.
    async fn bookings(db: &DatabaseConnection, id: i64) -> Result<Vec<Booking>, DbErr>;

    async fn insert(txn: &DatabaseTransaction, draft: &ProfileDraft) -> Result<i64, DbErr>;

    /// Returns `false` when no profile has `id`.
    async fn update(txn: &DatabaseTransaction, id: i64, draft: &ProfileDraft)
    -> Result<bool, DbErr>;

    /// Returns the name of the deleted profile, `None` when no profile has `id`.
    async fn delete(txn: &DatabaseTransaction, id: i64) -> Result<Option<String>, DbErr>;
}

/// Raw profile form as submitted by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub facebook_link: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub image_link: Option<String>,
    #[serde(default, alias = "seeking_talent", alias = "seeking_venue")]
    pub seeking: Option<String>,
    #[serde(default)]
    pub seeking_description: Option<String>,
}

/// A validated profile, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDraft {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub image_link: Option<String>,
    pub seeking: bool,
    pub seeking_description: Option<String>,
}

impl ProfileDraft {
    pub fn from_form(form: ProfileForm, requires_address: bool) -> Result<Self, ValidationError> {
        let name = required("Name", &form.name)?;
        let city = required("City", &form.city)?;
        let state = required("State", &form.state)?;
        if !choices::is_state(&state) {
            return Err(ValidationError::UnknownState(state));
        }

        let address = if requires_address {
            Some(required("Address", form.address.as_deref().unwrap_or_default())?)
        } else {
            None
        };

        let phone = optional(form.phone);
        if let Some(phone) = &phone {
            validate_phone(phone)?;
        }

        let mut genres: Vec<String> = Vec::new();
        for genre in form.genres.iter().map(|g| g.trim()).filter(|g| !g.is_empty()) {
            if !choices::is_genre(genre) {
                return Err(ValidationError::UnknownGenre(genre.to_string()));
            }
            if !genres.iter().any(|g| g == genre) {
                genres.push(genre.to_string());
            }
        }
        if genres.is_empty() {
            return Err(ValidationError::MissingField("Genres"));
        }

        Ok(Self {
            name,
            city,
            state,
            address,
            phone,
            genres,
            facebook_link: optional(form.facebook_link),
            website: optional(form.website),
            image_link: optional(form.image_link),
            seeking: is_checked(form.seeking.as_deref()),
            seeking_description: optional(form.seeking_description),
        })
    }
}

/// Checkbox and yes/no select values. An absent field is unchecked.
/// Case-insensitive substring match. Matching happens here rather than in a
/// `LIKE` clause so `%` and `_` stay literal and non-ASCII letters fold too.
fn name_matches(name: &str, term: &str) -> bool {
    name.to_lowercase().contains(&term.to_lowercase())
}

fn is_checked(value: Option<&str>) -> bool {
    value.is_some_and(|v| {
        matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "y" | "yes" | "on" | "true" | "1"
        )
    })
}

/// Every attribute of a stored profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub image_link: Option<String>,
    pub seeking: bool,
    pub seeking_description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ProfileDetail {
    pub profile: ProfileView,
    pub past_shows: Vec<BookingView>,
    pub upcoming_shows: Vec<BookingView>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

#[derive(Debug, Clone)]
pub struct SearchResults {
    pub search_term: String,
    pub count: usize,
    pub data: Vec<ProfileSummary>,
}

pub struct ProfileService<P: Profile> {
    db: Arc<Database>,
    _profile: PhantomData<P>,
}

impl<P: Profile> ProfileService<P> {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            _profile: PhantomData,
        }
    }

    #[instrument(skip(self), fields(kind = P::KIND))]
    pub async fn list(&self, now: DateTime<Utc>) -> Result<Vec<LocationGroup>, DirectoryError> {
        let profiles = P::all(&self.db.conn).await?;
        let counts = count_upcoming(P::show_times(&self.db.conn).await?, &now);

        Ok(group_by_location(profiles.into_iter().map(|p| {
            let summary = ProfileSummary {
                id: p.id,
                num_upcoming_shows: counts.get(&p.id).copied().unwrap_or(0),
                name: p.name,
            };
            (p.city, p.state, summary)
        })))
    }

    #[instrument(skip(self), fields(kind = P::KIND))]
    pub async fn search(
        &self,
        term: &str,
        now: DateTime<Utc>,
    ) -> Result<SearchResults, DirectoryError> {
        let term = term.trim();
        let profiles = P::all(&self.db.conn).await?;
        let counts = count_upcoming(P::show_times(&self.db.conn).await?, &now);

        let data: Vec<ProfileSummary> = profiles
            .into_iter()
            .filter(|p| name_matches(&p.name, term))
            .map(|p| ProfileSummary {
                id: p.id,
                num_upcoming_shows: counts.get(&p.id).copied().unwrap_or(0),
                name: p.name,
            })
            .collect();

        Ok(SearchResults {
            search_term: term.to_string(),
            count: data.len(),
            data,
        })
    }

    pub async fn get(&self, id: i64) -> Result<ProfileView, DirectoryError> {
        P::find(&self.db.conn, id)
            .await?
            .ok_or(DirectoryError::NotFound { kind: P::KIND, id })
    }

    #[instrument(skip(self), fields(kind = P::KIND))]
    pub async fn detail(&self, id: i64, now: DateTime<Utc>) -> Result<ProfileDetail, DirectoryError> {
        let profile = self.get(id).await?;
        let bookings = P::bookings(&self.db.conn, id).await?;
        let (past, upcoming) = partition_bookings(bookings, &now);

        Ok(ProfileDetail {
            profile,
            past_shows_count: past.len(),
            upcoming_shows_count: upcoming.len(),
            past_shows: past.iter().map(BookingView::from).collect(),
            upcoming_shows: upcoming.iter().map(BookingView::from).collect(),
        })
    }

    /// Validates and inserts in one transaction, rolled back on any error.
    #[instrument(skip(self, form), fields(kind = P::KIND, name = %form.name))]
    pub async fn create(&self, form: ProfileForm) -> Result<i64, DirectoryError> {
        let id = self
            .db
            .conn
            .transaction::<_, i64, DirectoryError>(|txn| {
                Box::pin(async move {
                    let draft = ProfileDraft::from_form(form, P::REQUIRES_ADDRESS)?;
                    Ok(P::insert(txn, &draft).await?)
                })
            })
            .await?;

        tracing::info!("{} created (ID: {})", P::KIND, id);
        Ok(id)
    }

    /// Overwrites every mutable attribute of profile `id`.
    #[instrument(skip(self, form), fields(kind = P::KIND, name = %form.name))]
    pub async fn update(&self, id: i64, form: ProfileForm) -> Result<(), DirectoryError> {
        self.db
            .conn
            .transaction::<_, (), DirectoryError>(|txn| {
                Box::pin(async move {
                    let draft = ProfileDraft::from_form(form, P::REQUIRES_ADDRESS)?;
                    if P::update(txn, id, &draft).await? {
                        Ok(())
                    } else {
                        Err(DirectoryError::NotFound { kind: P::KIND, id })
                    }
                })
            })
            .await?;

        tracing::info!("{} updated (ID: {})", P::KIND, id);
        Ok(())
    }

    /// Deletes profile `id` and, through the foreign keys, its shows.
    #[instrument(skip(self), fields(kind = P::KIND))]
    pub async fn delete(&self, id: i64) -> Result<String, DirectoryError> {
        let name = self
            .db
            .conn
            .transaction::<_, String, DirectoryError>(|txn| {
                Box::pin(async move {
                    P::delete(txn, id)
                        .await?
                        .ok_or(DirectoryError::NotFound { kind: P::KIND, id })
                })
            })
            .await?;

        tracing::info!("{} deleted: '{}' (ID: {})", P::KIND, name, id);
        Ok(name)
    }
}
