//! Author pages

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
    models::{parse_id, AuthorForm},
    views, AppState,
};

const LIST: &str = "/catalog/authors";
const NOT_FOUND: &str = "Author not found";

/// Body of the delete confirmation form
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteAuthorForm {
    pub authorid: String,
}

pub async fn list_authors(State(state): State<AppState>) -> AppResult<Markup> {
    let authors = state.services.authors.list().await?;
    Ok(views::authors::list(&authors))
}

pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Markup> {
    let id = path_id(&id, NOT_FOUND)?;
    let detail = state.services.authors.detail(id).await?;
    Ok(views::authors::detail(&detail))
}

pub async fn create_author_form(State(state): State<AppState>) -> Markup {
    views::authors::form(&state.services.authors.create_form())
}

pub async fn create_author(
    State(state): State<AppState>,
    Form(form): Form<AuthorForm>,
) -> AppResult<Response> {
    let outcome = state.services.authors.create(form).await?;
    Ok(form_response(outcome, views::authors::form))
}

pub async fn update_author_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Markup> {
    let id = path_id(&id, NOT_FOUND)?;
    let page = state.services.authors.update_form(id).await?;
    Ok(views::authors::form(&page))
}

pub async fn update_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<AuthorForm>,
) -> AppResult<Response> {
    let id = path_id(&id, NOT_FOUND)?;
    let outcome = state.services.authors.update(id, form).await?;
    Ok(form_response(outcome, views::authors::form))
}

pub async fn delete_author_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let detail = match parse_id(&id) {
        Some(id) => state.services.authors.delete_form(id).await?,
        None => None,
    };
    Ok(match detail {
        Some(detail) => views::authors::delete(&detail).into_response(),
        None => Redirect::to(LIST).into_response(),
    })
}

pub async fn delete_author(
    State(state): State<AppState>,
    Form(form): Form<DeleteAuthorForm>,
) -> AppResult<Redirect> {
    if let Some(id) = parse_id(&form.authorid) {
        state.services.authors.delete(id).await?;
    }
    Ok(Redirect::to(LIST))
}
