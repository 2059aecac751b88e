//! Book model and related types

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{parse_id, Author, Model};
use crate::{
    error::{AppError, AppResult},
    forms::{self, FormInput},
};

/// Full book record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub title: String,
    /// Reference to the author record
    pub author: Uuid,
    pub summary: String,
    pub isbn: String,
    /// References to genre records
    #[serde(default)]
    pub genre: Vec<Uuid>,
}

impl Model for Book {
    const COLLECTION: &'static str = "books";
    const SEGMENT: &'static str = "book";

    fn id(&self) -> Option<Uuid> {
        self.id
    }
}

/// Book with its author reference resolved
#[derive(Debug, Clone, PartialEq)]
pub struct BookWithAuthor {
    pub book: Book,
    /// `None` when the referenced author no longer exists
    pub author: Option<Author>,
}

/// Book projected down to its title, used by selection lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookTitle {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
}

impl BookTitle {
    pub const PROJECTION: &'static [&'static str] = &["title"];
}

/// Book form as posted by the browser. `genre` repeats once per checked box.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    pub summary: String,
    pub isbn: String,
    pub genre: Vec<String>,
}

/// Sanitized book form values
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct BookInput {
    #[validate(length(min = 1, message = "Title must not be empty."))]
    pub title: String,
    #[validate(
        length(min = 1, message = "Author must not be empty."),
        custom(function = "forms::reference_id")
    )]
    pub author: String,
    #[validate(length(min = 1, message = "Summary must not be empty."))]
    pub summary: String,
    #[validate(length(min = 1, message = "ISBN must not be empty"))]
    pub isbn: String,
    #[validate(custom(function = "forms::reference_ids"))]
    pub genre: Vec<String>,
}

impl From<BookForm> for BookInput {
    fn from(form: BookForm) -> Self {
        Self {
            title: form.title.trim().to_string(),
            author: form.author.trim().to_string(),
            summary: form.summary.trim().to_string(),
            isbn: form.isbn.trim().to_string(),
            genre: form
                .genre
                .iter()
                .map(|g| g.trim())
                .filter(|g| !g.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

impl From<&Book> for BookInput {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.to_string(),
            summary: book.summary.clone(),
            isbn: book.isbn.clone(),
            genre: book.genre.iter().map(Uuid::to_string).collect(),
        }
    }
}

impl FormInput for BookInput {
    const FIELDS: &'static [&'static str] = &["title", "author", "summary", "isbn", "genre"];

    fn escaped(self) -> Self {
        Self {
            title: forms::escape(&self.title),
            author: forms::escape(&self.author),
            summary: forms::escape(&self.summary),
            isbn: forms::escape(&self.isbn),
            genre: self.genre.iter().map(|g| forms::escape(g)).collect(),
        }
    }
}

impl BookInput {
    /// Whether the genre with this id is among the selected ones
    pub fn has_genre(&self, id: Uuid) -> bool {
        self.genre.iter().any(|g| parse_id(g) == Some(id))
    }

    pub fn into_book(self, id: Option<Uuid>) -> AppResult<Book> {
        let author = parse_id(&self.author)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid author: {}", self.author)))?;
        let genre = self
            .genre
            .iter()
            .map(|g| {
                parse_id(g).ok_or_else(|| AppError::BadRequest(format!("Invalid genre: {}", g)))
            })
            .collect::<AppResult<Vec<_>>>()?;
        Ok(Book {
            id,
            title: self.title,
            author,
            summary: self.summary,
            isbn: self.isbn,
            genre,
        })
    }
}
