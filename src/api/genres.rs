//! Genre pages

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
    models::{parse_id, GenreForm},
    views, AppState,
};

const LIST: &str = "/catalog/genres";
const NOT_FOUND: &str = "Genre not found";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteGenreForm {
    pub genreid: String,
}

pub async fn list_genres(State(state): State<AppState>) -> AppResult<Markup> {
    let genres = state.services.genres.list().await?;
    Ok(views::genres::list(&genres))
}

pub async fn get_genre(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Markup> {
    let id = path_id(&id, NOT_FOUND)?;
    let detail = state.services.genres.detail(id).await?;
    Ok(views::genres::detail(&detail))
}

pub async fn create_genre_form(State(state): State<AppState>) -> Markup {
    views::genres::form(&state.services.genres.create_form())
}

pub async fn create_genre(
    State(state): State<AppState>,
    Form(form): Form<GenreForm>,
) -> AppResult<Response> {
    let outcome = state.services.genres.create(form).await?;
    Ok(form_response(outcome, views::genres::form))
}

pub async fn update_genre_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Markup> {
    let id = path_id(&id, NOT_FOUND)?;
    let page = state.services.genres.update_form(id).await?;
    Ok(views::genres::form(&page))
}

pub async fn update_genre(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<GenreForm>,
) -> AppResult<Response> {
    let id = path_id(&id, NOT_FOUND)?;
    let outcome = state.services.genres.update(id, form).await?;
    Ok(form_response(outcome, views::genres::form))
}

pub async fn delete_genre_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let detail = match parse_id(&id) {
        Some(id) => state.services.genres.delete_form(id).await?,
        None => None,
    };
    Ok(match detail {
        Some(detail) => views::genres::delete(&detail).into_response(),
        None => Redirect::to(LIST).into_response(),
    })
}

pub async fn delete_genre(
    State(state): State<AppState>,
    Form(form): Form<DeleteGenreForm>,
) -> AppResult<Redirect> {
    if let Some(id) = parse_id(&form.genreid) {
        state.services.genres.delete(id).await?;
    }
    Ok(Redirect::to(LIST))
}
