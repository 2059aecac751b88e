//! Data models for the catalog

pub mod author;
pub mod book;
pub mod book_instance;
pub mod genre;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

// Re-export commonly used types
pub use author::{Author, AuthorForm, AuthorInput};
pub use book::{Book, BookForm, BookInput, BookTitle, BookWithAuthor};
pub use book_instance::{
    BookInstance, BookInstanceForm, BookInstanceInput, BookInstanceWithBook, BookStatus,
};
pub use genre::{Genre, GenreForm, GenreInput};

/// A record kind persisted as one document per record.
///
/// The identity lives in the `_id` field of the document and is assigned
/// by the store on insert.
pub trait Model: Serialize + DeserializeOwned + Send + Sync {
    /// Store collection holding records of this kind
    const COLLECTION: &'static str;
    /// Path segment used in canonical URLs (`/catalog/<segment>/<id>`)
    const SEGMENT: &'static str;

    fn id(&self) -> Option<Uuid>;

    /// Canonical resource path of this record
    fn url(&self) -> String {
        canonical_url(Self::SEGMENT, self.id())
    }
}

/// Builds `/catalog/<segment>/<id>`, or the bare type path for unsaved records
pub fn canonical_url(segment: &str, id: Option<Uuid>) -> String {
    match id {
        Some(id) => format!("/catalog/{}/{}", segment, id),
        None => format!("/catalog/{}", segment),
    }
}

/// Medium-length date, e.g. `Oct 6, 2020`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Parse a form date. Accepts `YYYY-MM-DD`, optionally followed by a time
/// part (`T` or space separated) that must itself be a valid time.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(value.get(..10)?, "%Y-%m-%d").ok()?;
    if value.len() == 10 || is_date_time(value) {
        Some(date)
    } else {
        None
    }
}

fn is_date_time(value: &str) -> bool {
    const FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
    ];
    DateTime::parse_from_rfc3339(value).is_ok()
        || FORMATS
            .iter()
            .any(|format| NaiveDateTime::parse_from_str(value, format).is_ok())
}

/// Parse a record identity coming from a URL or a form field
pub fn parse_id(value: &str) -> Option<Uuid> {
    Uuid::parse_str(value.trim()).ok()
}
