//! Catalog services: list/detail lookups and the create/update/delete flows

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod catalog;
pub mod genres;

use crate::repository::Repository;

/// Where a form submission ended up
#[derive(Debug)]
pub enum FormOutcome<P> {
    /// Validation failed; render this form page again. Nothing was stored.
    Invalid(P),
    /// Record stored; redirect to its canonical URL
    Saved { url: String },
}

impl<P> FormOutcome<P> {
    pub fn saved(url: String) -> Self {
        FormOutcome::Saved { url }
    }
}

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub authors: authors::AuthorsService,
    pub books: books::BooksService,
    pub book_instances: book_instances::BookInstancesService,
    pub genres: genres::GenresService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            authors: authors::AuthorsService::new(repository.clone()),
            books: books::BooksService::new(repository.clone()),
            book_instances: book_instances::BookInstancesService::new(repository.clone()),
            genres: genres::GenresService::new(repository.clone()),
            repository,
        }
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use crate::{
        models::{Author, Book, Genre},
        repository::{memory::MemoryStore, Repository},
    };

    pub fn repository() -> Repository {
        Repository::new(Arc::new(MemoryStore::new()))
    }

    pub async fn author(repo: &Repository, first: &str, family: &str) -> Author {
        repo.insert(&Author {
            id: None,
            first_name: first.to_string(),
            family_name: family.to_string(),
            date_of_birth: None,
            date_of_death: None,
        })
        .await
        .unwrap()
    }

    pub async fn genre(repo: &Repository, name: &str) -> Genre {
        repo.insert(&Genre {
            id: None,
            name: name.to_string(),
        })
        .await
        .unwrap()
    }

    pub async fn book(repo: &Repository, title: &str, author: &Author, genres: &[&Genre]) -> Book {
        repo.insert(&Book {
            id: None,
            title: title.to_string(),
            author: author.id.unwrap(),
            summary: format!("About {}", title),
            isbn: "9780000000000".to_string(),
            genre: genres.iter().map(|g| g.id.unwrap()).collect(),
        })
        .await
        .unwrap()
    }
}
