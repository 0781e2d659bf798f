use super::*;
use axum::{extract::Path, http::StatusCode, routing::get, Json, Router};
use tokio::net::TcpListener;

fn state(name: &str, slug: &str, businesses: u64, cities: u64) -> StateListing {
    StateListing {
        name: name.to_string(),
        slug: slug.to_string(),
        business_count: businesses,
        city_count: cities,
    }
}

async fn top_states() -> Json<Vec<StateListing>> {
    Json(vec![
        state("California", "california", 120, 14),
        state("Texas", "texas", 90, 9),
    ])
}

async fn top_cities() -> Json<Vec<CityListing>> {
    Json(vec![CityListing {
        name: "Los Angeles".to_string(),
        slug: "los-angeles".to_string(),
        state: "California".to_string(),
        business_count: 40,
    }])
}

async fn all_states() -> Json<Vec<StateListing>> {
    Json(vec![
        state("California", "california", 120, 14),
        state("Texas", "texas", 90, 9),
        state("New York", "new-york", 75, 11),
    ])
}

async fn cities_for_state(Path(state_slug): Path<String>) -> Json<Vec<CityListing>> {
    Json(vec![CityListing {
        name: "Sample City".to_string(),
        slug: state_slug,
        state: "Sample State".to_string(),
        business_count: 5,
    }])
}

async fn spawn_directory_server() -> Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new()
        .route("/api/top-states", get(top_states))
        .route("/api/top-cities", get(top_cities))
        .route("/api/states", get(all_states))
        .route("/api/cities/:state_slug", get(cities_for_state));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

async fn spawn_failing_server() -> Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new().fallback(|| async { StatusCode::INTERNAL_SERVER_ERROR });
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

#[tokio::test]
async fn top_states_decodes_listing_in_order() {
    let server_url = spawn_directory_server().await.expect("spawn server");
    let api = HttpDirectoryApi::new(server_url);

    let states = api.top_states().await.expect("top states");
    assert_eq!(states.len(), 2);
    assert_eq!(states[0].slug, "california");
    assert_eq!(states[0].business_count, 120);
    assert_eq!(states[1].name, "Texas");
}

#[tokio::test]
async fn cities_request_targets_the_state_path() {
    let server_url = spawn_directory_server().await.expect("spawn server");
    let api = HttpDirectoryApi::new(format!("{server_url}/"));

    let cities = api.cities_in_state("new-york").await.expect("cities");
    assert_eq!(cities.len(), 1);
    assert_eq!(cities[0].slug, "new-york");
}

#[tokio::test]
async fn server_error_surfaces_from_the_trait() {
    let server_url = spawn_failing_server().await.expect("spawn server");
    let api = HttpDirectoryApi::new(server_url);

    let err = api.top_cities().await.expect_err("must fail");
    assert!(err.to_string().contains("500"), "unexpected error: {err}");
}

#[tokio::test]
async fn loaders_degrade_to_empty_listings_on_failure() {
    let server_url = spawn_failing_server().await.expect("spawn server");
    let api = HttpDirectoryApi::new(server_url);

    assert!(load_states(&api).await.is_empty());
    assert!(load_cities(&api, "california").await.is_empty());
}

#[tokio::test]
async fn missing_backend_reports_unavailable() {
    let err = MissingDirectoryApi
        .states()
        .await
        .expect_err("missing backend must error");
    assert!(err.to_string().contains("unavailable"));

    assert!(load_cities(&MissingDirectoryApi, "texas").await.is_empty());
}
