//! Genre service

use uuid::Uuid;

use super::FormOutcome;
use crate::{
    error::{AppError, AppResult},
    forms::{FieldFailure, Submission},
    models::{Book, Genre, GenreForm, GenreInput, Model},
    repository::Repository,
};

#[derive(Debug, Clone)]
pub struct GenreDetail {
    pub genre: Genre,
    pub books: Vec<Book>,
}

#[derive(Debug, Clone)]
pub struct GenreFormPage {
    pub title: &'static str,
    pub genre: GenreInput,
    pub errors: Vec<FieldFailure>,
}

#[derive(Clone)]
pub struct GenresService {
    repository: Repository,
}

impl GenresService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Genre>> {
        self.repository.list().await
    }

    pub async fn detail(&self, id: Uuid) -> AppResult<GenreDetail> {
        self.find_detail(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Genre not found".to_string()))
    }

    async fn find_detail(&self, id: Uuid) -> AppResult<Option<GenreDetail>> {
        let (genre, books) = tokio::try_join!(
            self.repository.get::<Genre>(id),
            self.repository.genres_books(id),
        )?;
        Ok(genre.map(|genre| GenreDetail { genre, books }))
    }

    pub fn create_form(&self) -> GenreFormPage {
        GenreFormPage {
            title: "Create Genre",
            genre: GenreInput::default(),
            errors: Vec::new(),
        }
    }

    pub async fn create(&self, form: GenreForm) -> AppResult<FormOutcome<GenreFormPage>> {
        let submission = Submission::new(GenreInput::from(form));
        if !submission.is_valid() {
            tracing::debug!("Rejected genre: {:?}", submission.failures);
            return Ok(Self::rerender("Create Genre", submission));
        }

        let saved = self
            .repository
            .insert(&submission.input.into_genre(None))
            .await?;
        tracing::info!("Created genre {}", saved.url());
        Ok(FormOutcome::saved(saved.url()))
    }

    pub async fn update_form(&self, id: Uuid) -> AppResult<GenreFormPage> {
        let genre = self
            .repository
            .get::<Genre>(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Genre not found".to_string()))?;
        Ok(GenreFormPage {
            title: "Update Genre",
            genre: GenreInput::from(&genre),
            errors: Vec::new(),
        })
    }

    pub async fn update(&self, id: Uuid, form: GenreForm) -> AppResult<FormOutcome<GenreFormPage>> {
        let submission = Submission::new(GenreInput::from(form));
        if !submission.is_valid() {
            tracing::debug!("Rejected genre update {}: {:?}", id, submission.failures);
            return Ok(Self::rerender("Update Genre", submission));
        }

        let updated = self
            .repository
            .update(id, &submission.input.into_genre(Some(id)))
            .await?
            .ok_or_else(|| AppError::NotFound("Genre not found".to_string()))?;
        tracing::info!("Updated genre {}", updated.url());
        Ok(FormOutcome::saved(updated.url()))
    }

    pub async fn delete_form(&self, id: Uuid) -> AppResult<Option<GenreDetail>> {
        self.find_detail(id).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if self.repository.get::<Genre>(id).await?.is_none() {
            tracing::debug!("Deleting genre {} that was not found", id);
        }
        self.repository.remove::<Genre>(id).await?;
        tracing::info!("Deleted genre {}", id);
        Ok(())
    }

    fn rerender(title: &'static str, submission: Submission<GenreInput>) -> FormOutcome<GenreFormPage> {
        FormOutcome::Invalid(GenreFormPage {
            title,
            genre: submission.input,
            errors: submission.failures,
        })
    }
}
