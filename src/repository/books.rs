//! Book queries on Repository

use uuid::Uuid;

use super::{Filter, Repository};
use crate::{
    error::AppResult,
    models::{Author, Book, BookInstance, BookTitle, BookWithAuthor, Genre},
};

impl Repository {
    /// All books, titles only, for selection lists
    pub async fn books_titles(&self) -> AppResult<Vec<BookTitle>> {
        self.list_projected::<Book, BookTitle>(BookTitle::PROJECTION)
            .await
    }

    /// All books with their author resolved
    pub async fn books_with_authors(&self) -> AppResult<Vec<BookWithAuthor>> {
        let books: Vec<Book> = self.list().await?;
        let author_ids: Vec<Uuid> = books.iter().map(|b| b.author).collect();
        let authors = self.get_many::<Author>(&author_ids).await?;
        Ok(books
            .into_iter()
            .map(|book| BookWithAuthor {
                author: authors.get(&book.author).cloned(),
                book,
            })
            .collect())
    }

    /// Resolve a book's genre references, keeping the book's order
    pub async fn books_genres(&self, book: &Book) -> AppResult<Vec<Genre>> {
        let mut genres = self.get_many::<Genre>(&book.genre).await?;
        Ok(book.genre.iter().filter_map(|id| genres.remove(id)).collect())
    }

    /// Copies of a book
    pub async fn books_instances(&self, book_id: Uuid) -> AppResult<Vec<BookInstance>> {
        self.list_where(Filter::reference("book", book_id)).await
    }
}
