//! Catalog integration tests
//!
//! Most tests drive the full router in-process against the in-memory
//! store. The `#[ignore]`d ones expect a server on localhost:3000.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use tower::ServiceExt;

use local_library::{
    api,
    config::AppConfig,
    repository::{memory::MemoryStore, Repository},
    services::Services,
    AppState,
};

const BASE_URL: &str = "http://localhost:3000";

fn app_with(config: AppConfig) -> Router {
    let repository = Repository::new(Arc::new(MemoryStore::new()));
    api::router(AppState {
        config: Arc::new(config),
        services: Arc::new(Services::new(repository)),
    })
}

fn app() -> Router {
    app_with(AppConfig::default())
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Option<String>, String) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post(app: &Router, uri: &str, body: &str) -> (StatusCode, Option<String>, String) {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// Status, `Location` header and body text
async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Option<String>, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, location, String::from_utf8(bytes.to_vec()).unwrap())
}

/// Create a record through its form and return the redirect target
async fn create(app: &Router, entity: &str, body: &str) -> String {
    let (status, location, page) = post(app, &format!("/catalog/{}/create", entity), body).await;
    assert_eq!(status, StatusCode::SEE_OTHER, "create {} failed: {}", entity, page);
    location.expect("redirect target")
}

fn id_of(url: &str) -> &str {
    url.rsplit('/').next().unwrap()
}

/// An author, a genre and a book by that author in that genre
async fn seeded_book(app: &Router) -> String {
    let author = create(app, "author", "first_name=Ursula&family_name=LeGuin&date_of_birth=1929-10-21").await;
    let genre = create(app, "genre", "name=Fantasy").await;
    create(
        app,
        "book",
        &format!(
            "title=A+Wizard+of+Earthsea&author={}&summary=Ged&isbn=9780547773742&genre={}",
            id_of(&author),
            id_of(&genre)
        ),
    )
    .await
}

#[tokio::test]
async fn root_redirects_to_catalog() {
    let app = app();
    let (status, location, _) = get(&app, "/").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/catalog"));

    let (status, _, page) = get(&app, "/catalog").await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("Local Library Home"));
}

#[tokio::test]
async fn health_endpoints_answer_json() {
    let app = app();
    let (status, _, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["status"], "healthy");

    let (status, _, body) = get(&app, "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("ready"));
}

#[tokio::test]
async fn empty_imprint_rerenders_form() {
    let app = app();
    let book = seeded_book(&app).await;

    let (status, location, page) = post(
        &app,
        "/catalog/bookinstance/create",
        &format!("book={}&imprint=&status=Available", id_of(&book)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(location.is_none());
    assert!(page.contains("Imprint must be specified"));
    assert_eq!(page.matches("data-field=").count(), 1);
    assert!(page.contains("A Wizard of Earthsea"));

    let (_, _, list) = get(&app, "/catalog/bookinstances").await;
    assert!(list.contains("There are no book copies"));
}

#[tokio::test]
async fn valid_copy_redirects_to_new_record() {
    let app = app();
    let book = seeded_book(&app).await;

    let copy = create(
        &app,
        "bookinstance",
        &format!("book={}&imprint=First+Edition&status=Available", id_of(&book)),
    )
    .await;
    assert!(copy.starts_with("/catalog/bookinstance/"));

    let (status, _, page) = get(&app, &copy).await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("<title>Copy: A Wizard of Earthsea</title>"));
    assert!(page.contains("First Edition"));

    let (_, _, index) = get(&app, "/catalog").await;
    assert!(index.contains("<strong>Copies available: </strong>1"));
}

#[tokio::test]
async fn book_detail_shows_related_records() {
    let app = app();
    let book = seeded_book(&app).await;
    create(
        &app,
        "bookinstance",
        &format!("book={}&imprint=Parnassus&status=Loaned&due_back=2020-10-06", id_of(&book)),
    )
    .await;

    let (status, _, page) = get(&app, &book).await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("LeGuin, Ursula"));
    assert!(page.contains("Fantasy"));
    assert!(page.contains("Parnassus"));
    assert!(page.contains("Oct 6, 2020"));
}

#[tokio::test]
async fn update_keeps_identity() {
    let app = app();
    let genre = create(&app, "genre", "name=Poetry").await;

    let (status, _, page) = post(&app, &format!("{}/update", genre), "name=ab").await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("Genre name must contain between 3 and 100 characters"));

    let (status, location, _) = post(&app, &format!("{}/update", genre), "name=Verse").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some(genre.as_str()));

    let (_, _, page) = get(&app, &genre).await;
    assert!(page.contains("Genre: Verse"));
}

#[tokio::test]
async fn date_with_trailing_garbage_rerenders_author_form() {
    let app = app();
    let (status, location, page) = post(
        &app,
        "/catalog/author/create",
        "first_name=Isaac&family_name=Asimov&date_of_birth=1920-01-02Tbanana",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(location.is_none());
    assert!(page.contains("Invalid date of birth"));

    let (_, _, list) = get(&app, "/catalog/authors").await;
    assert!(list.contains("There are no authors."));
}

#[tokio::test]
async fn missing_records_are_not_found() {
    let app = app();
    for uri in [
        "/catalog/author/4f8b4c1e-8d5e-4b8e-9a55-6d2b8e1f0c11",
        "/catalog/book/not-an-id",
        "/catalog/genre/4f8b4c1e-8d5e-4b8e-9a55-6d2b8e1f0c11/update",
        "/catalog/nowhere",
    ] {
        let (status, _, page) = get(&app, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert!(page.contains("404"));
    }
}

#[tokio::test]
async fn error_detail_hidden_in_production() {
    let config = AppConfig {
        run_mode: "production".to_string(),
        ..AppConfig::default()
    };
    let production = app_with(config);
    let (status, _, page) = get(&production, "/catalog/author/not-an-id").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(!page.contains("<pre>"));

    let development = app_with(AppConfig::default());
    let (_, _, page) = get(&development, "/catalog/author/not-an-id").await;
    assert!(page.contains("<pre>"));
}

#[tokio::test]
async fn delete_redirects_to_list() {
    let app = app();
    let author = create(&app, "author", "first_name=Isaac&family_name=Asimov").await;

    let (status, location, _) = get(&app, "/catalog/author/4f8b4c1e-8d5e-4b8e-9a55-6d2b8e1f0c11/delete").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/catalog/authors"));

    let (status, _, page) = get(&app, &format!("{}/delete", author)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("name=\"authorid\""));

    let body = format!("authorid={}", id_of(&author));
    for _ in 0..2 {
        let (status, location, _) = post(&app, &format!("{}/delete", author), &body).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("/catalog/authors"));
    }

    let (status, _, _) = get(&app, &author).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn escaped_input_is_not_escaped_twice() {
    let app = app();
    let book = seeded_book(&app).await;
    let copy = create(
        &app,
        "bookinstance",
        &format!("book={}&imprint=Tor+%26+Forge&status=Reserved", id_of(&book)),
    )
    .await;

    let (_, _, page) = get(&app, &copy).await;
    assert!(page.contains("Tor &amp; Forge"));
    assert!(!page.contains("&amp;amp;"));
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_catalog_index() {
    let response = reqwest::get(format!("{}/catalog", BASE_URL))
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let page = response.text().await.expect("Failed to read body");
    assert!(page.contains("Local Library Home"));
}
