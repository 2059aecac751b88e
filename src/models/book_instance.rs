//! Book instance (physical copy) model and related types

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{author::optional_date, format_date, parse_id, Book, Model};
use crate::{
    error::{AppError, AppResult},
    forms::{self, FormInput},
};

/// Circulation status of a copy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookStatus {
    Available,
    #[default]
    Maintenance,
    Loaned,
    Reserved,
}

impl BookStatus {
    pub const ALL: [BookStatus; 4] = [
        BookStatus::Maintenance,
        BookStatus::Available,
        BookStatus::Loaned,
        BookStatus::Reserved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Available => "Available",
            BookStatus::Maintenance => "Maintenance",
            BookStatus::Loaned => "Loaned",
            BookStatus::Reserved => "Reserved",
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown status: {}", s)))
    }
}

/// Full book instance record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookInstance {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// Reference to the book this is a copy of
    pub book: Uuid,
    pub imprint: String,
    #[serde(default)]
    pub status: BookStatus,
    #[serde(default)]
    pub due_back: Option<NaiveDate>,
}

impl Model for BookInstance {
    const COLLECTION: &'static str = "bookinstances";
    const SEGMENT: &'static str = "bookinstance";

    fn id(&self) -> Option<Uuid> {
        self.id
    }
}

impl BookInstance {
    pub fn due_back_formatted(&self) -> String {
        self.due_back.map(format_date).unwrap_or_default()
    }
}

/// Copy with its book reference resolved
#[derive(Debug, Clone, PartialEq)]
pub struct BookInstanceWithBook {
    pub instance: BookInstance,
    /// `None` when the referenced book no longer exists
    pub book: Option<Book>,
}

impl BookInstanceWithBook {
    pub fn book_title(&self) -> &str {
        self.book.as_ref().map_or("(missing book)", |b| b.title.as_str())
    }
}

/// Book instance form as posted by the browser
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BookInstanceForm {
    pub book: String,
    pub imprint: String,
    pub status: String,
    pub due_back: String,
}

/// Sanitized book instance form values
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct BookInstanceInput {
    #[validate(
        length(min = 1, message = "Book must be specified"),
        custom(function = "forms::reference_id")
    )]
    pub book: String,
    #[validate(length(min = 1, message = "Imprint must be specified"))]
    pub imprint: String,
    #[validate(custom(function = "forms::book_status"))]
    pub status: String,
    #[validate(custom(function = "forms::iso8601_date"))]
    pub due_back: String,
}

impl From<BookInstanceForm> for BookInstanceInput {
    fn from(form: BookInstanceForm) -> Self {
        Self {
            book: form.book.trim().to_string(),
            imprint: form.imprint.trim().to_string(),
            status: form.status.trim().to_string(),
            due_back: form.due_back.trim().to_string(),
        }
    }
}

impl From<&BookInstance> for BookInstanceInput {
    fn from(instance: &BookInstance) -> Self {
        Self {
            book: instance.book.to_string(),
            imprint: instance.imprint.clone(),
            status: instance.status.to_string(),
            due_back: instance.due_back.map(|d| d.to_string()).unwrap_or_default(),
        }
    }
}

impl FormInput for BookInstanceInput {
    const FIELDS: &'static [&'static str] = &["book", "imprint", "status", "due_back"];

    fn escaped(self) -> Self {
        Self {
            book: forms::escape(&self.book),
            imprint: forms::escape(&self.imprint),
            status: forms::escape(&self.status),
            ..self
        }
    }
}

impl BookInstanceInput {
    /// Selected book, if the submitted value is a well-formed id
    pub fn selected_book(&self) -> Option<Uuid> {
        parse_id(&self.book)
    }

    pub fn into_book_instance(self, id: Option<Uuid>) -> AppResult<BookInstance> {
        let book = parse_id(&self.book)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid book: {}", self.book)))?;
        let status = if self.status.is_empty() {
            BookStatus::default()
        } else {
            self.status.parse()?
        };
        Ok(BookInstance {
            id,
            book,
            imprint: self.imprint,
            status,
            due_back: optional_date(&self.due_back)?,
        })
    }
}
