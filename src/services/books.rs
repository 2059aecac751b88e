//! Book service

use uuid::Uuid;

use super::FormOutcome;
use crate::{
    error::{AppError, AppResult},
    forms::{FieldFailure, Submission},
    models::{Author, Book, BookForm, BookInput, BookInstance, BookWithAuthor, Genre, Model},
    repository::Repository,
};

/// A book with its author, genres and copies resolved
#[derive(Debug, Clone)]
pub struct BookDetail {
    pub book: Book,
    pub author: Option<Author>,
    pub genres: Vec<Genre>,
    pub instances: Vec<BookInstance>,
}

#[derive(Debug, Clone)]
pub struct BookFormPage {
    pub title: &'static str,
    pub book: BookInput,
    pub authors: Vec<Author>,
    pub genres: Vec<Genre>,
    pub errors: Vec<FieldFailure>,
}

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<BookWithAuthor>> {
        self.repository.books_with_authors().await
    }

    pub async fn detail(&self, id: Uuid) -> AppResult<BookDetail> {
        self.find_detail(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
    }

    async fn find_detail(&self, id: Uuid) -> AppResult<Option<BookDetail>> {
        let (book, instances) = tokio::try_join!(
            self.repository.get::<Book>(id),
            self.repository.books_instances(id),
        )?;
        let Some(book) = book else {
            return Ok(None);
        };
        let (author, genres) = tokio::try_join!(
            self.repository.get::<Author>(book.author),
            self.repository.books_genres(&book),
        )?;
        Ok(Some(BookDetail {
            book,
            author,
            genres,
            instances,
        }))
    }

    /// Authors and genres offered by the book form
    async fn choices(&self) -> AppResult<(Vec<Author>, Vec<Genre>)> {
        tokio::try_join!(
            self.repository.list::<Author>(),
            self.repository.list::<Genre>(),
        )
    }

    pub async fn create_form(&self) -> AppResult<BookFormPage> {
        let (authors, genres) = self.choices().await?;
        Ok(BookFormPage {
            title: "Create Book",
            book: BookInput::default(),
            authors,
            genres,
            errors: Vec::new(),
        })
    }

    pub async fn create(&self, form: BookForm) -> AppResult<FormOutcome<BookFormPage>> {
        let submission = Submission::new(BookInput::from(form));
        if !submission.is_valid() {
            tracing::debug!("Rejected book: {:?}", submission.failures);
            return self.rerender("Create Book", submission).await;
        }

        let book = submission.input.into_book(None)?;
        let saved = self.repository.insert(&book).await?;
        tracing::info!("Created book {}", saved.url());
        Ok(FormOutcome::saved(saved.url()))
    }

    pub async fn update_form(&self, id: Uuid) -> AppResult<BookFormPage> {
        let (book, (authors, genres)) =
            tokio::try_join!(self.repository.get::<Book>(id), self.choices())?;
        let book = book.ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;
        Ok(BookFormPage {
            title: "Update Book",
            book: BookInput::from(&book),
            authors,
            genres,
            errors: Vec::new(),
        })
    }

    /// Replace the book stored under `id`, keeping that identity
    pub async fn update(&self, id: Uuid, form: BookForm) -> AppResult<FormOutcome<BookFormPage>> {
        let submission = Submission::new(BookInput::from(form));
        if !submission.is_valid() {
            tracing::debug!("Rejected book update {}: {:?}", id, submission.failures);
            return self.rerender("Update Book", submission).await;
        }

        let book = submission.input.into_book(Some(id))?;
        let updated = self
            .repository
            .update(id, &book)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;
        tracing::info!("Updated book {}", updated.url());
        Ok(FormOutcome::saved(updated.url()))
    }

    /// Book to confirm deletion of, with its copies
    pub async fn delete_form(&self, id: Uuid) -> AppResult<Option<BookDetail>> {
        self.find_detail(id).await
    }

    /// Remove the book. Its copies keep pointing at the removed id.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let copies = self.repository.books_instances(id).await?;
        if !copies.is_empty() {
            tracing::warn!("Deleting book {} with {} copies left behind", id, copies.len());
        }
        self.repository.remove::<Book>(id).await?;
        tracing::info!("Deleted book {}", id);
        Ok(())
    }

    /// Failure branch: the author and genre lists are fetched again here
    async fn rerender(
        &self,
        title: &'static str,
        submission: Submission<BookInput>,
    ) -> AppResult<FormOutcome<BookFormPage>> {
        let (authors, genres) = self.choices().await?;
        Ok(FormOutcome::Invalid(BookFormPage {
            title,
            book: submission.input,
            authors,
            genres,
            errors: submission.failures,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::BookStatus, services::testing};

    fn form(title: &str, author: &Author, genres: &[&Genre]) -> BookForm {
        BookForm {
            title: title.to_string(),
            author: author.id.unwrap().to_string(),
            summary: "A summary".to_string(),
            isbn: "9780441172719".to_string(),
            genre: genres.iter().map(|g| g.id.unwrap().to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn create_with_genres() {
        let repo = testing::repository();
        let author = testing::author(&repo, "Frank", "Herbert").await;
        let sf = testing::genre(&repo, "Science Fiction").await;
        let service = BooksService::new(repo.clone());

        let outcome = service.create(form("Dune", &author, &[&sf])).await.unwrap();

        let FormOutcome::Saved { url } = outcome else {
            panic!("expected save");
        };
        let books: Vec<Book> = repo.list().await.unwrap();
        assert_eq!(url, books[0].url());
        assert_eq!(books[0].genre, vec![sf.id.unwrap()]);
    }

    #[tokio::test]
    async fn invalid_create_refetches_choices() {
        let repo = testing::repository();
        let author = testing::author(&repo, "Frank", "Herbert").await;
        let sf = testing::genre(&repo, "Science Fiction").await;
        let service = BooksService::new(repo.clone());

        let mut posted = form("  ", &author, &[&sf]);
        posted.summary = "Spice & worms".to_string();
        let FormOutcome::Invalid(page) = service.create(posted).await.unwrap() else {
            panic!("expected re-render");
        };

        assert_eq!(page.errors.len(), 1);
        assert_eq!(page.errors[0].field, "title");
        assert_eq!(page.book.summary, "Spice &amp; worms");
        assert!(page.book.has_genre(sf.id.unwrap()));
        assert_eq!(page.authors.len(), 1);
        assert_eq!(page.genres.len(), 1);
        assert_eq!(repo.count::<Book>(None).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn update_keeps_identity_and_replaces_genres() {
        let repo = testing::repository();
        let author = testing::author(&repo, "Frank", "Herbert").await;
        let sf = testing::genre(&repo, "Science Fiction").await;
        let fantasy = testing::genre(&repo, "Fantasy").await;
        let book = testing::book(&repo, "Dune", &author, &[&sf]).await;
        let id = book.id.unwrap();
        let service = BooksService::new(repo.clone());

        let outcome = service
            .update(id, form("Dune Messiah", &author, &[&fantasy]))
            .await
            .unwrap();

        let FormOutcome::Saved { url } = outcome else {
            panic!("expected save");
        };
        assert_eq!(url, book.url());
        let stored = repo.get::<Book>(id).await.unwrap().unwrap();
        assert_eq!(stored.title, "Dune Messiah");
        assert_eq!(stored.genre, vec![fantasy.id.unwrap()]);
        assert_eq!(repo.count::<Book>(None).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn detail_resolves_references() {
        let repo = testing::repository();
        let author = testing::author(&repo, "Frank", "Herbert").await;
        let sf = testing::genre(&repo, "Science Fiction").await;
        let book = testing::book(&repo, "Dune", &author, &[&sf]).await;
        repo.insert(&BookInstance {
            id: None,
            book: book.id.unwrap(),
            imprint: "Chilton".to_string(),
            status: BookStatus::Available,
            due_back: None,
        })
        .await
        .unwrap();
        let service = BooksService::new(repo);

        let detail = service.detail(book.id.unwrap()).await.unwrap();
        assert_eq!(detail.author.map(|a| a.name()), Some("Herbert, Frank".to_string()));
        assert_eq!(detail.genres, vec![sf]);
        assert_eq!(detail.instances.len(), 1);
    }

    #[tokio::test]
    async fn delete_leaves_dangling_copies() {
        let repo = testing::repository();
        let author = testing::author(&repo, "Frank", "Herbert").await;
        let book = testing::book(&repo, "Dune", &author, &[]).await;
        repo.insert(&BookInstance {
            id: None,
            book: book.id.unwrap(),
            imprint: "Chilton".to_string(),
            status: BookStatus::Loaned,
            due_back: None,
        })
        .await
        .unwrap();
        let service = BooksService::new(repo.clone());

        service.delete(book.id.unwrap()).await.unwrap();

        assert!(service.delete_form(book.id.unwrap()).await.unwrap().is_none());
        let copies = repo.book_instances_with_books().await.unwrap();
        assert_eq!(copies.len(), 1);
        assert_eq!(copies[0].book, None);
    }

    #[tokio::test]
    async fn list_resolves_authors() {
        let repo = testing::repository();
        let author = testing::author(&repo, "Frank", "Herbert").await;
        testing::book(&repo, "Dune", &author, &[]).await;
        let service = BooksService::new(repo);

        let books = service.list().await.unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].author.as_ref().map(|a| a.name()), Some("Herbert, Frank".to_string()));
    }
}
