use askama::Template;
use axum::response::Html;

use crate::{
    choices,
    http_server::error::HttpError,
    services::{
        listing::LocationGroup,
        profile::{Profile, ProfileDetail, ProfileView, SearchResults},
        show::ShowView,
    },
};

/// Renders a page, turning template failures into the 500 page.
pub fn render<T: Template>(template: &T) -> Result<Html<String>, HttpError> {
    Ok(Html(template.render()?))
}

/// Labels and paths the profile pages need, shared by venues and artists.
#[derive(Debug, Clone)]
pub struct ProfilePage {
    pub kind: &'static str,
    pub collection: &'static str,
    pub counterpart_collection: &'static str,
    pub seeking_field: &'static str,
    pub seeking_label: &'static str,
    pub requires_address: bool,
}

impl ProfilePage {
    pub fn of<P: Profile>() -> Self {
        Self {
            kind: P::KIND,
            collection: P::COLLECTION,
            counterpart_collection: P::COUNTERPART_COLLECTION,
            seeking_field: P::SEEKING_FIELD,
            seeking_label: P::SEEKING_LABEL,
            requires_address: P::REQUIRES_ADDRESS,
        }
    }
}

/// Current values of the profile form, empty for a new profile.
#[derive(Debug, Default)]
pub struct FormValues {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub genres: Vec<String>,
    pub facebook_link: String,
    pub website: String,
    pub image_link: String,
    pub seeking: bool,
    pub seeking_description: String,
}

impl FormValues {
    pub fn state_is(&self, state: &str) -> bool {
        self.state == state
    }

    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }
}

impl From<ProfileView> for FormValues {
    fn from(profile: ProfileView) -> Self {
        Self {
            name: profile.name,
            city: profile.city,
            state: profile.state,
            address: profile.address.unwrap_or_default(),
            phone: profile.phone.unwrap_or_default(),
            genres: profile.genres,
            facebook_link: profile.facebook_link.unwrap_or_default(),
            website: profile.website.unwrap_or_default(),
            image_link: profile.image_link.unwrap_or_default(),
            seeking: profile.seeking,
            seeking_description: profile.seeking_description.unwrap_or_default(),
        }
    }
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub notice: Option<String>,
}

#[derive(Template)]
#[template(path = "profiles/list.html")]
pub struct ProfileListTemplate {
    pub page: ProfilePage,
    pub groups: Vec<LocationGroup>,
    pub notice: Option<String>,
}

#[derive(Template)]
#[template(path = "profiles/search.html")]
pub struct ProfileSearchTemplate {
    pub page: ProfilePage,
    pub results: SearchResults,
    pub notice: Option<String>,
}

#[derive(Template)]
#[template(path = "profiles/detail.html")]
pub struct ProfileDetailTemplate {
    pub page: ProfilePage,
    pub detail: ProfileDetail,
    pub notice: Option<String>,
}

#[derive(Template)]
#[template(path = "profiles/form.html")]
pub struct ProfileFormTemplate {
    pub page: ProfilePage,
    pub action: String,
    pub form: FormValues,
    pub editing: bool,
    pub states: &'static [&'static str],
    pub genres: &'static [&'static str],
    pub notice: Option<String>,
}

impl ProfileFormTemplate {
    pub fn new(page: ProfilePage, action: String, form: FormValues, editing: bool) -> Self {
        Self {
            page,
            action,
            form,
            editing,
            states: &choices::STATES,
            genres: &choices::GENRES,
            notice: None,
        }
    }
}

#[derive(Template)]
#[template(path = "shows/list.html")]
pub struct ShowListTemplate {
    pub shows: Vec<ShowView>,
    pub notice: Option<String>,
}

#[derive(Template)]
#[template(path = "shows/form.html")]
pub struct ShowFormTemplate {
    pub notice: Option<String>,
}
