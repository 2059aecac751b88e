//! Catalog overview service

use crate::{
    error::AppResult,
    models::{Author, Book, BookInstance, BookStatus, Genre},
    repository::{Filter, Repository},
};

/// Record counts shown on the catalog home page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogCounts {
    pub books: u64,
    pub copies: u64,
    pub available_copies: u64,
    pub authors: u64,
    pub genres: u64,
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Count every collection; the counts are independent and run concurrently
    pub async fn counts(&self) -> AppResult<CatalogCounts> {
        let repo = &self.repository;
        let available = Filter::new("status", BookStatus::Available.as_str());
        let (books, copies, available_copies, authors, genres) = tokio::try_join!(
            repo.count::<Book>(None),
            repo.count::<BookInstance>(None),
            repo.count::<BookInstance>(Some(available)),
            repo.count::<Author>(None),
            repo.count::<Genre>(None),
        )?;
        Ok(CatalogCounts {
            books,
            copies,
            available_copies,
            authors,
            genres,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing;

    #[tokio::test]
    async fn counts_each_collection() {
        let repo = testing::repository();
        let author = testing::author(&repo, "Frank", "Herbert").await;
        let genre = testing::genre(&repo, "Science Fiction").await;
        let book = testing::book(&repo, "Dune", &author, &[&genre]).await;
        for status in [BookStatus::Available, BookStatus::Loaned, BookStatus::Available] {
            repo.insert(&BookInstance {
                id: None,
                book: book.id.unwrap(),
                imprint: "Chilton".to_string(),
                status,
                due_back: None,
            })
            .await
            .unwrap();
        }

        let counts = CatalogService::new(repo).counts().await.unwrap();
        assert_eq!(
            counts,
            CatalogCounts {
                books: 1,
                copies: 3,
                available_copies: 2,
                authors: 1,
                genres: 1,
            }
        );
    }
}
