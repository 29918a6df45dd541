//! Pages shared by venues and artists, instantiated once per profile kind.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{FromRequestParts, Path, State},
    http::{StatusCode, request::Parts},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::{Form, cookie::CookieJar};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{
    http_server::{
        error::HttpError,
        flash,
        http_routes::home::render_home,
        state::AppState,
        templates::{
            FormValues, ProfileDetailTemplate, ProfileFormTemplate, ProfileListTemplate,
            ProfilePage, ProfileSearchTemplate, render,
        },
    },
    services::{
        error::DirectoryError,
        profile::{Profile, ProfileForm, ProfileService},
    },
};

pub fn routes<P: Profile>() -> Router<Arc<AppState>> {
    let base = format!("/{}", P::COLLECTION);
    Router::new()
        .route(&base, get(list::<P>))
        .route(&format!("{base}/search"), post(search::<P>))
        .route(
            &format!("{base}/create"),
            get(create_form::<P>).post(create_submission::<P>),
        )
        .route(
            &format!("{base}/{{id}}"),
            get(detail::<P>).delete(delete::<P>),
        )
        .route(
            &format!("{base}/{{id}}/edit"),
            get(edit_form::<P>).post(edit_submission::<P>),
        )
}

#[derive(Debug, Deserialize)]
struct SearchForm {
    #[serde(default)]
    search_term: String,
}

#[derive(Debug, Serialize)]
struct DeleteOutcome {
    success: bool,
    message: String,
}

/// Numeric `{id}` path segment; anything else is a 404.
struct ProfileId(i64);

impl<S: Send + Sync> FromRequestParts<S> for ProfileId {
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<i64>::from_request_parts(parts, state)
            .await
            .map(|Path(id)| ProfileId(id))
            .map_err(|rejection| HttpError::NotFound(rejection.body_text()))
    }
}

async fn list<P: Profile>(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>), HttpError> {
    let (jar, notice) = flash::take(jar);
    let groups = ProfileService::<P>::new(app_state.db.clone())
        .list(Utc::now())
        .await?;

    let page = render(&ProfileListTemplate {
        page: ProfilePage::of::<P>(),
        groups,
        notice,
    })?;
    Ok((jar, page))
}

async fn search<P: Profile>(
    State(app_state): State<Arc<AppState>>,
    Form(form): Form<SearchForm>,
) -> Result<Html<String>, HttpError> {
    let results = ProfileService::<P>::new(app_state.db.clone())
        .search(&form.search_term, Utc::now())
        .await?;

    render(&ProfileSearchTemplate {
        page: ProfilePage::of::<P>(),
        results,
        notice: None,
    })
}

async fn detail<P: Profile>(
    State(app_state): State<Arc<AppState>>,
    ProfileId(id): ProfileId,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>), HttpError> {
    let (jar, notice) = flash::take(jar);
    let detail = ProfileService::<P>::new(app_state.db.clone())
        .detail(id, Utc::now())
        .await?;

    let page = render(&ProfileDetailTemplate {
        page: ProfilePage::of::<P>(),
        detail,
        notice,
    })?;
    Ok((jar, page))
}

async fn create_form<P: Profile>() -> Result<Html<String>, HttpError> {
    render(&ProfileFormTemplate::new(
        ProfilePage::of::<P>(),
        format!("/{}/create", P::COLLECTION),
        FormValues::default(),
        false,
    ))
}

async fn create_submission<P: Profile>(
    State(app_state): State<Arc<AppState>>,
    Form(form): Form<ProfileForm>,
) -> Result<Html<String>, HttpError> {
    let name = form.name.trim().to_string();

    let notice = match ProfileService::<P>::new(app_state.db.clone())
        .create(form)
        .await
    {
        Ok(_) => format!("{} {} was successfully listed!", P::KIND, name),
        Err(DirectoryError::Validation(err)) => {
            tracing::info!("Rejected {} form: {}", P::KIND, err);
            format!(
                "An error occurred. {} {} could not be listed. {}",
                P::KIND,
                name,
                err
            )
        }
        Err(err) => {
            tracing::error!("Failed to create {} '{}': {}", P::KIND, name, err);
            format!("An error occurred. {} {} could not be listed.", P::KIND, name)
        }
    };

    render_home(Some(notice))
}

async fn edit_form<P: Profile>(
    State(app_state): State<Arc<AppState>>,
    ProfileId(id): ProfileId,
) -> Result<Html<String>, HttpError> {
    let profile = ProfileService::<P>::new(app_state.db.clone()).get(id).await?;

    render(&ProfileFormTemplate::new(
        ProfilePage::of::<P>(),
        format!("/{}/{}/edit", P::COLLECTION, id),
        FormValues::from(profile),
        true,
    ))
}

async fn edit_submission<P: Profile>(
    State(app_state): State<Arc<AppState>>,
    ProfileId(id): ProfileId,
    jar: CookieJar,
    Form(form): Form<ProfileForm>,
) -> Result<(CookieJar, Redirect), HttpError> {
    let name = form.name.trim().to_string();

    let notice = match ProfileService::<P>::new(app_state.db.clone())
        .update(id, form)
        .await
    {
        Ok(()) => format!("{} {} was successfully updated!", P::KIND, name),
        Err(err @ DirectoryError::NotFound { .. }) => return Err(err.into()),
        Err(DirectoryError::Validation(err)) => {
            tracing::info!("Rejected {} {} edit: {}", P::KIND, id, err);
            format!(
                "An error occurred. {} {} could not be updated. {}",
                P::KIND,
                name,
                err
            )
        }
        Err(err) => {
            tracing::error!("Failed to update {} {}: {}", P::KIND, id, err);
            format!("An error occurred. {} {} could not be updated.", P::KIND, name)
        }
    };

    let jar = flash::set(jar, &notice);
    Ok((jar, Redirect::to(&format!("/{}/{}", P::COLLECTION, id))))
}

async fn delete<P: Profile>(
    State(app_state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    jar: CookieJar,
) -> Response {
    let Ok(id) = raw_id.parse::<i64>() else {
        return delete_failed(
            StatusCode::NOT_FOUND,
            format!("{} {} not found", P::KIND, raw_id),
        );
    };

    match ProfileService::<P>::new(app_state.db.clone())
        .delete(id)
        .await
    {
        Ok(name) => {
            let message = format!("{} {} was successfully deleted.", P::KIND, name);
            let jar = flash::set(jar, &message);
            (
                StatusCode::OK,
                jar,
                Json(DeleteOutcome {
                    success: true,
                    message,
                }),
            )
                .into_response()
        }
        Err(err @ DirectoryError::NotFound { .. }) => {
            delete_failed(StatusCode::NOT_FOUND, err.to_string())
        }
        Err(err) => {
            tracing::error!("Failed to delete {} {}: {}", P::KIND, id, err);
            delete_failed(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("An error occurred. {} {} could not be deleted.", P::KIND, id),
            )
        }
    }
}

fn delete_failed(status: StatusCode, message: String) -> Response {
    (
        status,
        Json(DeleteOutcome {
            success: false,
            message,
        }),
    )
        .into_response()
}
