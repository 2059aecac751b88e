//! Book pages

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use maud::Markup;
use serde::Deserialize;

use super::{form_response, path_id};
use crate::{
    error::AppResult,
    models::{parse_id, BookForm},
    views, AppState,
};

const LIST: &str = "/catalog/books";
const NOT_FOUND: &str = "Book not found";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteBookForm {
    pub bookid: String,
}

/// Books with their author resolved
pub async fn list_books(State(state): State<AppState>) -> AppResult<Markup> {
    let books = state.services.books.list().await?;
    Ok(views::books::list(&books))
}

/// Book with author, genres and copies
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Markup> {
    let id = path_id(&id, NOT_FOUND)?;
    let detail = state.services.books.detail(id).await?;
    Ok(views::books::detail(&detail))
}

pub async fn create_book_form(State(state): State<AppState>) -> AppResult<Markup> {
    let page = state.services.books.create_form().await?;
    Ok(views::books::form(&page))
}

/// Repeated `genre` keys arrive as a list
pub async fn create_book(
    State(state): State<AppState>,
    Form(form): Form<BookForm>,
) -> AppResult<Response> {
    let outcome = state.services.books.create(form).await?;
    Ok(form_response(outcome, views::books::form))
}

pub async fn update_book_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Markup> {
    let id = path_id(&id, NOT_FOUND)?;
    let page = state.services.books.update_form(id).await?;
    Ok(views::books::form(&page))
}

pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<BookForm>,
) -> AppResult<Response> {
    let id = path_id(&id, NOT_FOUND)?;
    let outcome = state.services.books.update(id, form).await?;
    Ok(form_response(outcome, views::books::form))
}

pub async fn delete_book_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let detail = match parse_id(&id) {
        Some(id) => state.services.books.delete_form(id).await?,
        None => None,
    };
    Ok(match detail {
        Some(detail) => views::books::delete(&detail).into_response(),
        None => Redirect::to(LIST).into_response(),
    })
}

pub async fn delete_book(
    State(state): State<AppState>,
    Form(form): Form<DeleteBookForm>,
) -> AppResult<Redirect> {
    if let Some(id) = parse_id(&form.bookid) {
        state.services.books.delete(id).await?;
    }
    Ok(Redirect::to(LIST))
}
