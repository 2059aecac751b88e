//! Book instance queries on Repository

use uuid::Uuid;

use super::Repository;
use crate::{
    error::AppResult,
    models::{Book, BookInstance, BookInstanceWithBook},
};

impl Repository {
    /// All copies with their book resolved
    pub async fn book_instances_with_books(&self) -> AppResult<Vec<BookInstanceWithBook>> {
        let instances: Vec<BookInstance> = self.list().await?;
        let book_ids: Vec<Uuid> = instances.iter().map(|i| i.book).collect();
        let books = self.get_many::<Book>(&book_ids).await?;
        Ok(instances
            .into_iter()
            .map(|instance| BookInstanceWithBook {
                book: books.get(&instance.book).cloned(),
                instance,
            })
            .collect())
    }

    /// One copy with its book resolved
    pub async fn book_instances_get_with_book(
        &self,
        id: Uuid,
    ) -> AppResult<Option<BookInstanceWithBook>> {
        let Some(instance) = self.get::<BookInstance>(id).await? else {
            return Ok(None);
        };
        let book = self.get::<Book>(instance.book).await?;
        Ok(Some(BookInstanceWithBook { instance, book }))
    }
}
