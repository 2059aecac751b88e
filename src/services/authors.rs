//! Author service

use uuid::Uuid;

use super::FormOutcome;
use crate::{
    error::{AppError, AppResult},
    forms::{FieldFailure, Submission},
    models::{Author, AuthorForm, AuthorInput, Book, Model},
    repository::Repository,
};

/// An author with the books they wrote
#[derive(Debug, Clone)]
pub struct AuthorDetail {
    pub author: Author,
    pub books: Vec<Book>,
}

#[derive(Debug, Clone)]
pub struct AuthorFormPage {
    pub title: &'static str,
    pub author: AuthorInput,
    pub errors: Vec<FieldFailure>,
}

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Author>> {
        self.repository.list().await
    }

    /// Author and their books, fetched concurrently
    pub async fn detail(&self, id: Uuid) -> AppResult<AuthorDetail> {
        self.find_detail(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Author not found".to_string()))
    }

    async fn find_detail(&self, id: Uuid) -> AppResult<Option<AuthorDetail>> {
        let (author, books) = tokio::try_join!(
            self.repository.get::<Author>(id),
            self.repository.authors_books(id),
        )?;
        Ok(author.map(|author| AuthorDetail { author, books }))
    }

    pub fn create_form(&self) -> AuthorFormPage {
        AuthorFormPage {
            title: "Create Author",
            author: AuthorInput::default(),
            errors: Vec::new(),
        }
    }

    pub async fn create(&self, form: AuthorForm) -> AppResult<FormOutcome<AuthorFormPage>> {
        let submission = Submission::new(AuthorInput::from(form));
        if !submission.is_valid() {
            tracing::debug!("Rejected author: {:?}", submission.failures);
            return Ok(Self::rerender("Create Author", submission));
        }

        let author = submission.input.into_author(None)?;
        let saved = self.repository.insert(&author).await?;
        tracing::info!("Created author {}", saved.url());
        Ok(FormOutcome::saved(saved.url()))
    }

    pub async fn update_form(&self, id: Uuid) -> AppResult<AuthorFormPage> {
        let author = self
            .repository
            .get::<Author>(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Author not found".to_string()))?;
        Ok(AuthorFormPage {
            title: "Update Author",
            author: AuthorInput::from(&author),
            errors: Vec::new(),
        })
    }

    /// Replace the author stored under `id`, keeping that identity
    pub async fn update(
        &self,
        id: Uuid,
        form: AuthorForm,
    ) -> AppResult<FormOutcome<AuthorFormPage>> {
        let submission = Submission::new(AuthorInput::from(form));
        if !submission.is_valid() {
            tracing::debug!("Rejected author update {}: {:?}", id, submission.failures);
            return Ok(Self::rerender("Update Author", submission));
        }

        let author = submission.input.into_author(Some(id))?;
        let updated = self
            .repository
            .update(id, &author)
            .await?
            .ok_or_else(|| AppError::NotFound("Author not found".to_string()))?;
        tracing::info!("Updated author {}", updated.url());
        Ok(FormOutcome::saved(updated.url()))
    }

    /// Author to confirm deletion of, with the books that would lose their author
    pub async fn delete_form(&self, id: Uuid) -> AppResult<Option<AuthorDetail>> {
        self.find_detail(id).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if let Some(detail) = self.find_detail(id).await? {
            if !detail.books.is_empty() {
                tracing::warn!(
                    "Deleting author {} still referenced by {} book(s)",
                    id,
                    detail.books.len()
                );
            }
        }
        self.repository.remove::<Author>(id).await?;
        tracing::info!("Deleted author {}", id);
        Ok(())
    }

    fn rerender(
        title: &'static str,
        submission: Submission<AuthorInput>,
    ) -> FormOutcome<AuthorFormPage> {
        FormOutcome::Invalid(AuthorFormPage {
            title,
            author: submission.input,
            errors: submission.failures,
        })
    }
}
