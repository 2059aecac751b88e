//! Book instance (copy) pages

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
    models::{parse_id, BookInstanceForm},
    views, AppState,
};

const LIST: &str = "/catalog/bookinstances";
const NOT_FOUND: &str = "Book copy not found";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteBookInstanceForm {
    pub bookinstanceid: String,
}

pub async fn list_book_instances(State(state): State<AppState>) -> AppResult<Markup> {
    let instances = state.services.book_instances.list().await?;
    Ok(views::book_instances::list(&instances))
}

pub async fn get_book_instance(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Markup> {
    let id = path_id(&id, NOT_FOUND)?;
    let entry = state.services.book_instances.detail(id).await?;
    Ok(views::book_instances::detail(&entry))
}

pub async fn create_book_instance_form(State(state): State<AppState>) -> AppResult<Markup> {
    let page = state.services.book_instances.create_form().await?;
    Ok(views::book_instances::form(&page))
}

pub async fn create_book_instance(
    State(state): State<AppState>,
    Form(form): Form<BookInstanceForm>,
) -> AppResult<Response> {
    let outcome = state.services.book_instances.create(form).await?;
    Ok(form_response(outcome, views::book_instances::form))
}

pub async fn update_book_instance_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Markup> {
    let id = path_id(&id, NOT_FOUND)?;
    let page = state.services.book_instances.update_form(id).await?;
    Ok(views::book_instances::form(&page))
}

pub async fn update_book_instance(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<BookInstanceForm>,
) -> AppResult<Response> {
    let id = path_id(&id, NOT_FOUND)?;
    let outcome = state.services.book_instances.update(id, form).await?;
    Ok(form_response(outcome, views::book_instances::form))
}

pub async fn delete_book_instance_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let entry = match parse_id(&id) {
        Some(id) => state.services.book_instances.delete_form(id).await?,
        None => None,
    };
    Ok(match entry {
        Some(entry) => views::book_instances::delete(&entry).into_response(),
        None => Redirect::to(LIST).into_response(),
    })
}

pub async fn delete_book_instance(
    State(state): State<AppState>,
    Form(form): Form<DeleteBookInstanceForm>,
) -> AppResult<Redirect> {
    if let Some(id) = parse_id(&form.bookinstanceid) {
        state.services.book_instances.delete(id).await?;
    }
    Ok(Redirect::to(LIST))
}
