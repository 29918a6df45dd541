use std::sync::Arc;

use axum::{Router, extract::State, response::Html, routing::get};
use axum_extra::extract::{Form, cookie::CookieJar};

use crate::{
    http_server::{
        error::HttpError,
        flash,
        http_routes::home::render_home,
        state::AppState,
        templates::{ShowFormTemplate, ShowListTemplate, render},
    },
    services::{
        error::DirectoryError,
        show::{ShowForm, ShowService},
    },
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/shows", get(list))
        .route("/shows/create", get(create_form).post(create_submission))
}

async fn list(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>), HttpError> {
    let (jar, notice) = flash::take(jar);
    let shows = ShowService::new(app_state.db.clone()).list().await?;

    let page = render(&ShowListTemplate { shows, notice })?;
    Ok((jar, page))
}

async fn create_form() -> Result<Html<String>, HttpError> {
    render(&ShowFormTemplate { notice: None })
}

async fn create_submission(
    State(app_state): State<Arc<AppState>>,
    Form(form): Form<ShowForm>,
) -> Result<Html<String>, HttpError> {
    let notice = match ShowService::new(app_state.db.clone()).create(form).await {
        Ok(_) => "Show was successfully listed!".to_string(),
        Err(DirectoryError::Validation(err)) => {
            tracing::info!("Rejected show form: {}", err);
            format!("An error occurred. Show could not be listed. {err}")
        }
        Err(err) => {
            tracing::error!("Failed to create show: {}", err);
            "An error occurred. Show could not be listed.".to_string()
        }
    };

    render_home(Some(notice))
}
