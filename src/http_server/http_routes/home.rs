use std::sync::Arc;

use axum::{Router, response::Html, routing::get};
use axum_extra::extract::cookie::CookieJar;

use crate::http_server::{
    error::HttpError,
    flash,
    state::AppState,
    templates::{HomeTemplate, render},
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(home))
}

async fn home(jar: CookieJar) -> Result<(CookieJar, Html<String>), HttpError> {
    let (jar, notice) = flash::take(jar);
    let page = render_home(notice)?;
    Ok((jar, page))
}

/// Landing page, with an optional notice from the request that led here.
pub fn render_home(notice: Option<String>) -> Result<Html<String>, HttpError> {
    render(&HomeTemplate { notice })
}
