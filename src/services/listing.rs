//! Pure shaping of query results: past/upcoming classification, upcoming
//! counts and `(city, state)` grouping. Every function takes `now` explicitly.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use crate::formatting::{DateStyle, format_timestamp};

/// The other side of a show: the artist for a venue page, the venue for an artist page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counterpart {
    pub id: i64,
    pub name: String,
    pub image_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub show_id: i64,
    pub start_time: DateTime<Utc>,
    pub counterpart: Counterpart,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingView {
    pub id: i64,
    pub name: String,
    pub image_link: Option<String>,
    pub start_time: String,
}

impl From<&Booking> for BookingView {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.counterpart.id,
            name: booking.counterpart.name.clone(),
            image_link: booking.counterpart.image_link.clone(),
            start_time: format_timestamp(&booking.start_time, DateStyle::Medium),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSummary {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationGroup {
    pub city: String,
    pub state: String,
    pub entries: Vec<ProfileSummary>,
}

/// A show starting exactly at `now` has already started and counts as past.
pub fn is_upcoming(start_time: &DateTime<Utc>, now: &DateTime<Utc>) -> bool {
    start_time > now
}

/// Splits bookings into `(past, upcoming)`, each ordered by start time.
pub fn partition_bookings(
    mut bookings: Vec<Booking>,
    now: &DateTime<Utc>,
) -> (Vec<Booking>, Vec<Booking>) {
    bookings.sort_by_key(|b| (b.start_time, b.show_id));
    bookings
        .into_iter()
        .partition(|b| !is_upcoming(&b.start_time, now))
}

/// Counts upcoming shows per owner id from `(owner_id, start_time)` pairs.
pub fn count_upcoming<I>(show_times: I, now: &DateTime<Utc>) -> HashMap<i64, usize>
where
    I: IntoIterator<Item = (i64, DateTime<Utc>)>,
{
    let mut counts = HashMap::new();
    for (owner_id, start_time) in show_times {
        if is_upcoming(&start_time, now) {
            *counts.entry(owner_id).or_insert(0) += 1;
        }
    }
    counts
}

/// Groups `(city, state, summary)` rows, ordered by state then city, entries by name.
pub fn group_by_location<I>(rows: I) -> Vec<LocationGroup>
where
    I: IntoIterator<Item = (String, String, ProfileSummary)>,
{
    let mut groups: BTreeMap<(String, String), Vec<ProfileSummary>> = BTreeMap::new();
    for (city, state, summary) in rows {
        groups.entry((state, city)).or_default().push(summary);
    }

    groups
        .into_iter()
        .map(|((state, city), mut entries)| {
            entries.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
            LocationGroup {
                city,
                state,
                entries,
            }
        })
        .collect()
}
