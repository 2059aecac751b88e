//! Book instance (copy) service

use uuid::Uuid;

use super::FormOutcome;
use crate::{
    error::{AppError, AppResult},
    forms::{FieldFailure, Submission},
    models::{
        BookInstance, BookInstanceForm, BookInstanceInput, BookInstanceWithBook, BookTitle, Model,
    },
    repository::Repository,
};

/// Data for the copy create/update form
#[derive(Debug, Clone)]
pub struct BookInstanceFormPage {
    pub title: &'static str,
    pub instance: BookInstanceInput,
    pub book_list: Vec<BookTitle>,
    pub errors: Vec<FieldFailure>,
}

#[derive(Clone)]
pub struct BookInstancesService {
    repository: Repository,
}

impl BookInstancesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All copies with their book
    pub async fn list(&self) -> AppResult<Vec<BookInstanceWithBook>> {
        self.repository.book_instances_with_books().await
    }

    /// One copy with its book
    pub async fn detail(&self, id: Uuid) -> AppResult<BookInstanceWithBook> {
        self.repository
            .book_instances_get_with_book(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Book copy not found".to_string()))
    }

    pub async fn create_form(&self) -> AppResult<BookInstanceFormPage> {
        Ok(BookInstanceFormPage {
            title: "Create Book Instance",
            instance: BookInstanceInput::default(),
            book_list: self.repository.books_titles().await?,
            errors: Vec::new(),
        })
    }

    pub async fn create(
        &self,
        form: BookInstanceForm,
    ) -> AppResult<FormOutcome<BookInstanceFormPage>> {
        let submission = Submission::new(BookInstanceInput::from(form));
        if !submission.is_valid() {
            tracing::debug!("Rejected copy: {:?}", submission.failures);
            return self.rerender("Create Book Instance", submission).await;
        }

        let instance = submission.input.into_book_instance(None)?;
        let saved = self.repository.insert(&instance).await?;
        tracing::info!("Created book instance {}", saved.url());
        Ok(FormOutcome::saved(saved.url()))
    }

    /// Form prefilled with the stored copy
    pub async fn update_form(&self, id: Uuid) -> AppResult<BookInstanceFormPage> {
        let (instance, book_list) = tokio::try_join!(
            self.repository.get::<BookInstance>(id),
            self.repository.books_titles(),
        )?;
        let instance =
            instance.ok_or_else(|| AppError::NotFound("Book copy not found".to_string()))?;
        Ok(BookInstanceFormPage {
            title: "Update Book Instance",
            instance: BookInstanceInput::from(&instance),
            book_list,
            errors: Vec::new(),
        })
    }

    /// Replace the copy stored under `id`, keeping that identity
    pub async fn update(
        &self,
        id: Uuid,
        form: BookInstanceForm,
    ) -> AppResult<FormOutcome<BookInstanceFormPage>> {
        let submission = Submission::new(BookInstanceInput::from(form));
        if !submission.is_valid() {
            tracing::debug!("Rejected copy update {}: {:?}", id, submission.failures);
            return self.rerender("Update Book Instance", submission).await;
        }

        let instance = submission.input.into_book_instance(Some(id))?;
        let updated = self
            .repository
            .update(id, &instance)
            .await?
            .ok_or_else(|| AppError::NotFound("Book copy not found".to_string()))?;
        tracing::info!("Updated book instance {}", updated.url());
        Ok(FormOutcome::saved(updated.url()))
    }

    /// Copy to confirm deletion of; `None` when it does not exist
    pub async fn delete_form(&self, id: Uuid) -> AppResult<Option<BookInstanceWithBook>> {
        self.repository.book_instances_get_with_book(id).await
    }

    /// Remove the copy. Removal does not depend on the copy still existing.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if self.repository.get::<BookInstance>(id).await?.is_none() {
            tracing::debug!("Deleting book instance {} that was not found", id);
        }
        self.repository.remove::<BookInstance>(id).await?;
        tracing::info!("Deleted book instance {}", id);
        Ok(())
    }

    /// Failure branch: fetch the book list again and hand back the form
    async fn rerender(
        &self,
        title: &'static str,
        submission: Submission<BookInstanceInput>,
    ) -> AppResult<FormOutcome<BookInstanceFormPage>> {
        Ok(FormOutcome::Invalid(BookInstanceFormPage {
            title,
            book_list: self.repository.books_titles().await?,
            instance: submission.input,
            errors: submission.failures,
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::{
        models::{Book, BookStatus},
        repository::{MockDocumentStore, Query},
        services::testing,
    };

    async fn library() -> (Repository, Book) {
        let repo = testing::repository();
        let author = testing::author(&repo, "Ursula", "LeGuin").await;
        let book = testing::book(&repo, "The Lathe of Heaven", &author, &[]).await;
        (repo, book)
    }

    fn form(book: &Book, imprint: &str, status: &str) -> BookInstanceForm {
        BookInstanceForm {
            book: book.id.unwrap().to_string(),
            imprint: imprint.to_string(),
            status: status.to_string(),
            due_back: String::new(),
        }
    }

    #[tokio::test]
    async fn valid_create_persists_and_redirects_to_new_record() {
        let (repo, book) = library().await;
        let service = BookInstancesService::new(repo.clone());

        let outcome = service
            .create(form(&book, "First Edition", "Available"))
            .await
            .unwrap();

        let stored: Vec<BookInstance> = repo.list().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].imprint, "First Edition");
        assert_eq!(stored[0].status, BookStatus::Available);
        assert_eq!(stored[0].book, book.id.unwrap());
        match outcome {
            FormOutcome::Saved { url } => assert_eq!(url, stored[0].url()),
            FormOutcome::Invalid(page) => panic!("unexpected failures: {:?}", page.errors),
        }
    }

    #[tokio::test]
    async fn empty_imprint_rerenders_with_book_list() {
        let (repo, book) = library().await;
        let service = BookInstancesService::new(repo.clone());

        let outcome = service.create(form(&book, "", "Available")).await.unwrap();

        let FormOutcome::Invalid(page) = outcome else {
            panic!("empty imprint must not be saved");
        };
        assert_eq!(page.errors.len(), 1);
        assert_eq!(page.errors[0].field, "imprint");
        assert_eq!(page.book_list.len(), 1);
        assert_eq!(page.book_list[0].title, "The Lathe of Heaven");
        assert_eq!(page.instance.selected_book(), book.id);
        assert_eq!(repo.count::<BookInstance>(None).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn rerender_preserves_sanitized_input() {
        let (repo, book) = library().await;
        let service = BookInstancesService::new(repo);

        let mut posted = form(&book, "  <i>Ace</i>  ", "Loaned");
        posted.due_back = "not a date".to_string();
        let FormOutcome::Invalid(page) = service.create(posted).await.unwrap() else {
            panic!("bad date must not be saved");
        };
        assert_eq!(page.instance.imprint, "&lt;i&gt;Ace&lt;&#x2F;i&gt;");
        assert_eq!(page.instance.status, "Loaned");
        assert_eq!(page.errors.len(), 1);
        assert_eq!(page.errors[0].field, "due_back");
    }

    #[tokio::test]
    async fn failed_validation_never_writes() {
        let mut store = MockDocumentStore::new();
        store
            .expect_find()
            .withf(|collection, query| {
                collection == "books" && query == &Query::all().project(&["title"])
            })
            .times(1)
            .returning(|_, _| Ok(vec![json!({"_id": Uuid::new_v4(), "title": "Dune"})]));
        store.expect_insert().never();
        store.expect_update_by_id().never();
        let service = BookInstancesService::new(Repository::new(Arc::new(store)));

        let outcome = service
            .create(BookInstanceForm::default())
            .await
            .unwrap();

        let FormOutcome::Invalid(page) = outcome else {
            panic!("empty form must not be saved");
        };
        let fields: Vec<_> = page.errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["book", "imprint"]);
        assert_eq!(page.book_list.len(), 1);
    }

    #[tokio::test]
    async fn store_errors_are_forwarded() {
        let mut store = MockDocumentStore::new();
        store
            .expect_insert()
            .times(1)
            .returning(|_, _| Err(AppError::Internal("connection reset".to_string())));
        let service = BookInstancesService::new(Repository::new(Arc::new(store)));

        let result = service
            .create(BookInstanceForm {
                book: Uuid::new_v4().to_string(),
                imprint: "Ace".to_string(),
                ..Default::default()
            })
            .await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn update_keeps_identity() {
        let (repo, book) = library().await;
        let service = BookInstancesService::new(repo.clone());
        let FormOutcome::Saved { url } = service
            .create(form(&book, "Ace", "Maintenance"))
            .await
            .unwrap()
        else {
            panic!("expected save");
        };
        let original: Vec<BookInstance> = repo.list().await.unwrap();
        let id = original[0].id.unwrap();

        let rejected = service.update(id, form(&book, " ", "Loaned")).await.unwrap();
        assert!(matches!(rejected, FormOutcome::Invalid(_)));
        assert_eq!(repo.get::<BookInstance>(id).await.unwrap(), Some(original[0].clone()));

        let outcome = service.update(id, form(&book, "Ace, 2nd", "Loaned")).await.unwrap();
        let FormOutcome::Saved { url: updated_url } = outcome else {
            panic!("expected save");
        };
        assert_eq!(updated_url, url);
        let stored: Vec<BookInstance> = repo.list().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, Some(id));
        assert_eq!(stored[0].imprint, "Ace, 2nd");
        assert_eq!(stored[0].status, BookStatus::Loaned);
    }

    #[tokio::test]
    async fn update_of_vanished_copy_is_not_found() {
        let (repo, book) = library().await;
        let service = BookInstancesService::new(repo);
        let result = service
            .update(Uuid::new_v4(), form(&book, "Ace", "Loaned"))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn detail_of_missing_copy_is_not_found() {
        let (repo, _) = library().await;
        let service = BookInstancesService::new(repo);
        let err = service.detail(Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn detail_resolves_book() {
        let (repo, book) = library().await;
        let service = BookInstancesService::new(repo.clone());
        service.create(form(&book, "Ace", "Available")).await.unwrap();
        let id = repo.list::<BookInstance>().await.unwrap()[0].id.unwrap();

        let detail = service.detail(id).await.unwrap();
        assert_eq!(detail.book_title(), "The Lathe of Heaven");
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let (repo, book) = library().await;
        let service = BookInstancesService::new(repo.clone());
        service.create(form(&book, "Ace", "Available")).await.unwrap();
        let id = repo.list::<BookInstance>().await.unwrap()[0].id.unwrap();

        assert!(service.delete_form(id).await.unwrap().is_some());
        service.delete(id).await.unwrap();
        service.delete(id).await.unwrap();
        assert!(service.delete_form(id).await.unwrap().is_none());
        assert_eq!(repo.count::<BookInstance>(None).await.unwrap(), 0);
    }
}
