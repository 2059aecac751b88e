//! HTTP handlers and the application router

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod catalog;
pub mod genres;
pub mod health;

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use maud::Markup;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use crate::{
    error::{AppError, ErrorReport},
    models::parse_id,
    services::FormOutcome,
    views, AppState,
};

/// Build the application router with every catalog route
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let catalog = Router::new()
        .route("/", get(catalog::index))
        // Authors
        .route("/authors", get(authors::list_authors))
        .route(
            "/author/create",
            get(authors::create_author_form).post(authors::create_author),
        )
        .route("/author/:id", get(authors::get_author))
        .route(
            "/author/:id/update",
            get(authors::update_author_form).post(authors::update_author),
        )
        .route(
            "/author/:id/delete",
            get(authors::delete_author_form).post(authors::delete_author),
        )
        // Books
        .route("/books", get(books::list_books))
        .route(
            "/book/create",
            get(books::create_book_form).post(books::create_book),
        )
        .route("/book/:id", get(books::get_book))
        .route(
            "/book/:id/update",
            get(books::update_book_form).post(books::update_book),
        )
        .route(
            "/book/:id/delete",
            get(books::delete_book_form).post(books::delete_book),
        )
        // Book instances
        .route("/bookinstances", get(book_instances::list_book_instances))
        .route(
            "/bookinstance/create",
            get(book_instances::create_book_instance_form).post(book_instances::create_book_instance),
        )
        .route("/bookinstance/:id", get(book_instances::get_book_instance))
        .route(
            "/bookinstance/:id/update",
            get(book_instances::update_book_instance_form).post(book_instances::update_book_instance),
        )
        .route(
            "/bookinstance/:id/delete",
            get(book_instances::delete_book_instance_form).post(book_instances::delete_book_instance),
        )
        // Genres
        .route("/genres", get(genres::list_genres))
        .route(
            "/genre/create",
            get(genres::create_genre_form).post(genres::create_genre),
        )
        .route("/genre/:id", get(genres::get_genre))
        .route(
            "/genre/:id/update",
            get(genres::update_genre_form).post(genres::update_genre),
        )
        .route(
            "/genre/:id/delete",
            get(genres::delete_genre_form).post(genres::delete_genre),
        );

    Router::new()
        .route("/", get(|| async { Redirect::to("/catalog") }))
        .nest("/catalog", catalog)
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), render_error_page))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound("Page not found".to_string())
}

/// Turn any response carrying an [`ErrorReport`] into the HTML error page
async fn render_error_page(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    let Some(report) = response.extensions().get::<ErrorReport>().cloned() else {
        return response;
    };
    let detail = state
        .config
        .show_error_detail()
        .then_some(report.detail.as_str());
    (
        report.status,
        views::error_page(report.status, &report.message, detail),
    )
        .into_response()
}

/// Identity from a path segment. A malformed id names no record.
fn path_id(raw: &str, missing: &str) -> Result<Uuid, AppError> {
    parse_id(raw).ok_or_else(|| AppError::NotFound(missing.to_string()))
}

/// Re-render the form on failure, redirect (303) to the record on success
fn form_response<P>(outcome: FormOutcome<P>, render: impl FnOnce(&P) -> Markup) -> Response {
    match outcome {
        FormOutcome::Invalid(page) => render(&page).into_response(),
        FormOutcome::Saved { url } => Redirect::to(&url).into_response(),
    }
}
