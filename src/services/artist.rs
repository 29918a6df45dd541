use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::entities::{self, artist, decode_genres, encode_genres};
use crate::services::listing::{Booking, Counterpart};
use crate::services::profile::{Profile, ProfileDraft, ProfileView};

pub struct Artists;

impl From<artist::Model> for ProfileView {
    fn from(model: artist::Model) -> Self {
        Self {
            id: model.id,
            genres: decode_genres(&model.genres),
            name: model.name,
            city: model.city,
            state: model.state,
            address: None,
            phone: model.phone,
            facebook_link: model.facebook_link,
            website: model.website,
            image_link: model.image_link,
            seeking: model.seeking_venue,
            seeking_description: model.seeking_description,
        }
    }
}

fn apply(model: &mut artist::ActiveModel, draft: &ProfileDraft) {
    model.name = Set(draft.name.clone());
    model.city = Set(draft.city.clone());
    model.state = Set(draft.state.clone());
    model.phone = Set(draft.phone.clone());
    model.genres = Set(encode_genres(&draft.genres));
    model.facebook_link = Set(draft.facebook_link.clone());
    model.website = Set(draft.website.clone());
    model.image_link = Set(draft.image_link.clone());
    model.seeking_venue = Set(draft.seeking);
    model.seeking_description = Set(draft.seeking_description.clone());
}

#[async_trait]
impl Profile for Artists {
    const KIND: &'static str = "Artist";
    const COLLECTION: &'static str = "artists";
    const COUNTERPART_COLLECTION: &'static str = "venues";
    const SEEKING_FIELD: &'static str = "seeking_venue";
    const SEEKING_LABEL: &'static str = "Seeking performance venues";
    const REQUIRES_ADDRESS: bool = false;

    async fn all(db: &DatabaseConnection) -> Result<Vec<ProfileView>, DbErr> {
        let artists = artist::Entity::find()
            .order_by_asc(artist::Column::Name)
            .all(db)
            .await?;
        Ok(artists.into_iter().map(ProfileView::from).collect())
    }

    async fn find(db: &DatabaseConnection, id: i64) -> Result<Option<ProfileView>, DbErr> {
        let artist = artist::Entity::find_by_id(id).one(db).await?;
        Ok(artist.map(ProfileView::from))
    }

    async fn show_times(db: &DatabaseConnection) -> Result<Vec<(i64, DateTime<Utc>)>, DbErr> {
        let shows = entities::show::Entity::find().all(db).await?;
        Ok(shows
            .into_iter()
            .map(|show| (show.artist_id, show.start_time))
            .collect())
    }

    async fn bookings(db: &DatabaseConnection, id: i64) -> Result<Vec<Booking>, DbErr> {
        let rows = entities::show::Entity::find()
            .filter(entities::show::Column::ArtistId.eq(id))
            .find_also_related(entities::venue::Entity)
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(show, venue)| {
                let venue = venue?;
                Some(Booking {
                    show_id: show.id,
                    start_time: show.start_time,
                    counterpart: Counterpart {
                        id: venue.id,
                        name: venue.name,
                        image_link: venue.image_link,
                    },
                })
            })
            .collect())
    }

    async fn insert(txn: &DatabaseTransaction, draft: &ProfileDraft) -> Result<i64, DbErr> {
        let mut model = <artist::ActiveModel as Default>::default();
        apply(&mut model, draft);
        let artist = model.insert(txn).await?;
        Ok(artist.id)
    }

    async fn update(
        txn: &DatabaseTransaction,
        id: i64,
        draft: &ProfileDraft,
    ) -> Result<bool, DbErr> {
        let Some(existing) = artist::Entity::find_by_id(id).one(txn).await? else {
            return Ok(false);
        };

        let mut model: artist::ActiveModel = existing.into();
        apply(&mut model, draft);
        model.update(txn).await?;
        Ok(true)
    }

    async fn delete(txn: &DatabaseTransaction, id: i64) -> Result<Option<String>, DbErr> {
        let Some(existing) = artist::Entity::find_by_id(id).one(txn).await? else {
            return Ok(None);
        };

        artist::Entity::delete_by_id(id).exec(txn).await?;
        Ok(Some(existing.name))
    }
}
