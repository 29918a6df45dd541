use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use axum::Router;
use color_eyre::eyre::{Context, eyre};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    database::Database,
    http_server::{
        error::not_found,
        http_routes::{home, profiles, shows},
        state::AppState,
    },
    services::{artist::Artists, venue::Venues},
};

pub struct HttpServerConfig {
    pub port: u16,
    pub database: Database,
    pub static_dir: PathBuf,
}

pub fn router(app_state: Arc<AppState>, static_dir: &Path) -> Router {
    Router::new()
        .merge(home::routes())
        .merge(profiles::routes::<Venues>())
        .merge(profiles::routes::<Artists>())
        .merge(shows::routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

pub async fn start(config: HttpServerConfig) -> color_eyre::Result<()> {
    let app_state = Arc::new(AppState {
        db: Arc::new(config.database),
    });

    if !config.static_dir.is_dir() {
        tracing::warn!(
            "Static directory {} does not exist, assets will 404",
            config.static_dir.display()
        );
    }
    let app = router(app_state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .wrap_err_with(|| eyre!("Failed to bind to port {}", config.port))?;
    tracing::info!("Listening on http://0.0.0.0:{}", config.port);

    axum::serve(listener, app)
        .await
        .wrap_err("Failed to start HTTP server")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use sea_orm::{EntityTrait, PaginatorTrait};
    use tower::ServiceExt;

    use crate::entities;
    use crate::test_utils::test_db;

    const ACME: &str = "name=The+Acme+Lounge&city=Austin&state=TX&address=1+Main+St\
        &phone=512-555-0100&genres=Jazz&genres=Blues&seeking_talent=y";

    async fn test_app() -> (Router, Arc<Database>) {
        let db = test_db().await;
        let app_state = Arc::new(AppState { db: db.clone() });
        (router(app_state, Path::new("static")), db)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn delete(uri: &str) -> Request<Body> {
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        (status, body_text(response).await)
    }

    #[tokio::test]
    async fn test_home_page() {
        let (app, _) = test_app().await;

        let (status, body) = send(&app, get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Booking Directory"));
    }

    #[tokio::test]
    async fn test_create_venue_then_detail() {
        let (app, _) = test_app().await;

        let (status, body) = send(&app, post_form("/venues/create", ACME)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Venue The Acme Lounge was successfully listed!"));

        let (status, body) = send(&app, get("/venues/1")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("The Acme Lounge"));
        assert!(body.contains("1 Main St"));
        assert!(body.contains("512-555-0100"));
        assert!(body.contains("Blues"));
        assert!(body.contains("Seeking talent"));
        assert!(body.contains("No past shows"));
        assert!(body.contains("No upcoming shows"));
    }

    #[tokio::test]
    async fn test_create_venue_with_invalid_phone() {
        let (app, db) = test_app().await;
        let form = ACME.replace("512-555-0100", "not-a-phone");

        let (status, body) = send(&app, post_form("/venues/create", &form)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(
            "An error occurred. Venue The Acme Lounge could not be listed. \
             Must be a valid US phone number"
        ));

        let count = entities::venue::Entity::find().count(&db.conn).await.unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_create_forms_render_choices() {
        let (app, _) = test_app().await;

        let (status, body) = send(&app, get("/venues/create")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"name="address""#));
        assert!(body.contains(r#"name="seeking_talent""#));
        assert!(body.contains("Rock n Roll"));
        assert!(body.contains("WY"));

        let (status, body) = send(&app, get("/artists/create")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body.contains(r#"name="address""#));
        assert!(body.contains(r#"name="seeking_venue""#));
    }

    #[tokio::test]
    async fn test_search_venues() {
        let (app, _) = test_app().await;
        send(&app, post_form("/venues/create", ACME)).await;
        let other = ACME.replace("The+Acme+Lounge", "Park+Square+Live");
        send(&app, post_form("/venues/create", &other)).await;

        let (status, body) = send(&app, post_form("/venues/search", "search_term=ACME")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("The Acme Lounge"));
        assert!(!body.contains("Park Square Live"));
    }

    #[tokio::test]
    async fn test_venue_listing_groups_by_city() {
        let (app, _) = test_app().await;
        send(&app, post_form("/venues/create", ACME)).await;

        let (status, body) = send(&app, get("/venues")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Austin, TX"));
        assert!(body.contains("The Acme Lounge"));
    }

    #[tokio::test]
    async fn test_edit_redirects_with_notice() {
        let (app, _) = test_app().await;
        send(&app, post_form("/venues/create", ACME)).await;

        let (status, body) = send(&app, get("/venues/1/edit")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("The Acme Lounge"));
        assert!(body.contains("checked"));

        let form = ACME.replace("The+Acme+Lounge", "Renamed+Hall");
        let response = app
            .clone()
            .oneshot(post_form("/venues/1/edit", &form))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/venues/1");
        let cookie = response.headers()[header::SET_COOKIE]
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string();

        let request = Request::builder()
            .uri("/venues/1")
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Venue Renamed Hall was successfully updated!"));
    }

    #[tokio::test]
    async fn test_edit_missing_venue_is_404() {
        let (app, _) = test_app().await;

        let (status, _) = send(&app, get("/venues/12/edit")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, post_form("/venues/12/edit", ACME)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_venue() {
        let (app, db) = test_app().await;
        send(&app, post_form("/venues/create", ACME)).await;

        let response = app.clone().oneshot(delete("/venues/1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(header::SET_COOKIE));
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Venue The Acme Lounge was successfully deleted.");

        let count = entities::venue::Entity::find().count(&db.conn).await.unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_delete_missing_venue() {
        let (app, _) = test_app().await;

        let (status, body) = send(&app, delete("/venues/99")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Venue 99 not found");
    }

    #[tokio::test]
    async fn test_missing_profile_is_404() {
        let (app, _) = test_app().await;

        let (status, body) = send(&app, get("/artists/5")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Not Found"));
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_404() {
        let (app, _) = test_app().await;

        for uri in ["/venues/abc", "/artists/abc/edit", "/venues/1.5"] {
            let (status, body) = send(&app, get(uri)).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert!(body.contains("Not Found"), "{uri}");
        }

        let (status, body) = send(&app, post_form("/artists/abc/edit", "name=x")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Not Found"));
    }

    #[tokio::test]
    async fn test_delete_non_numeric_id() {
        let (app, _) = test_app().await;

        let (status, body) = send(&app, delete("/venues/abc")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Venue abc not found");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (app, _) = test_app().await;

        let (status, _) = send(&app, get("/nowhere")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_and_list_show() {
        let (app, _) = test_app().await;
        send(&app, post_form("/venues/create", ACME)).await;
        let artist = "name=Guns+N+Petals&city=San+Francisco&state=CA\
            &phone=650-253-0000&genres=Rock+n+Roll";
        let (_, body) = send(&app, post_form("/artists/create", artist)).await;
        assert!(body.contains("Artist Guns N Petals was successfully listed!"));

        let show = "artist_id=1&venue_id=1&start_time=2035-04-01+20%3A00%3A00";
        let (status, body) = send(&app, post_form("/shows/create", show)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Show was successfully listed!"));

        let (status, body) = send(&app, get("/shows")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Guns N Petals"));
        assert!(body.contains("The Acme Lounge"));
        assert!(body.contains("Sun 04, 01, 2035 8:00PM"));
        assert!(body.contains("Sunday April, 1, 2035 at 8:00PM"));

        let (_, body) = send(&app, get("/artists/1")).await;
        assert!(body.contains("1 Upcoming Shows"));
    }

    #[tokio::test]
    async fn test_show_with_unknown_artist() {
        let (app, db) = test_app().await;
        send(&app, post_form("/venues/create", ACME)).await;

        let show = "artist_id=42&venue_id=1&start_time=2035-04-01+20%3A00%3A00";
        let (status, body) = send(&app, post_form("/shows/create", show)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Show could not be listed. Artist 42 does not exist"));

        let count = entities::show::Entity::find().count(&db.conn).await.unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_static_assets() {
        let (app, _) = test_app().await;

        let (status, body) = send(&app, get("/static/css/main.css")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("notice"));
    }
}
