//! HTML pages rendered with maud
//!
//! Free-text values reach the views already HTML-escaped by the form
//! pipeline, so they are written out with [`stored`] instead of maud's own
//! escaping. Everything else (dates, ids, error messages) goes through the
//! regular `(value)` splice.

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod catalog;
pub mod genres;

use axum::http::StatusCode;
use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::forms::{self, FieldFailure};

const CSS: &str = "\
body{font-family:sans-serif;margin:0;display:flex}\
nav.sidebar{min-width:12rem;padding:1rem;background:#f4f4f4}\
nav.sidebar ul{list-style:none;padding:0}\
main{padding:1rem 2rem;flex:1}\
ul.errors{color:#b00020}\
.status-available{color:green}\
.status-maintenance,.status-reserved{color:#b36b00}\
.status-loaned{color:#b00020}\
label{display:block;margin-top:.5rem}";

/// Value that was escaped before it was stored
pub fn stored(value: &str) -> PreEscaped<&str> {
    PreEscaped(value)
}

/// Full page: sidebar navigation plus `content`
pub fn layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (stored(title)) }
                style { (PreEscaped(CSS)) }
            }
            body {
                (sidebar())
                main {
                    (content)
                }
            }
        }
    }
}

fn sidebar() -> Markup {
    html! {
        nav.sidebar {
            ul {
                li { a href="/catalog" { "Home" } }
                li { a href="/catalog/books" { "All books" } }
                li { a href="/catalog/authors" { "All authors" } }
                li { a href="/catalog/genres" { "All genres" } }
                li { a href="/catalog/bookinstances" { "All book-instances" } }
            }
            hr;
            ul {
                li { a href="/catalog/author/create" { "Create new author" } }
                li { a href="/catalog/genre/create" { "Create new genre" } }
                li { a href="/catalog/book/create" { "Create new book" } }
                li { a href="/catalog/bookinstance/create" { "Create new book instance (copy)" } }
            }
        }
    }
}

/// Validation failures listed above a form, in reported order
pub fn failures(errors: &[FieldFailure]) -> Markup {
    html! {
        @if !errors.is_empty() {
            ul.errors {
                @for error in errors {
                    li data-field=(error.field) { (error.message) }
                }
            }
        }
    }
}

/// Confirmation form posting the record id back under `<entity>id`
pub fn delete_form(field: &str, id: &str) -> Markup {
    html! {
        form method="POST" {
            input type="hidden" name=(field) value=(id);
            button type="submit" { "Delete" }
        }
    }
}

/// Error page. `detail` is only passed outside production.
pub fn error_page(status: StatusCode, message: &str, detail: Option<&str>) -> Markup {
    layout(
        &forms::escape(message),
        html! {
            h1 { (message) }
            h2 { (status.as_u16()) }
            @if let Some(detail) = detail {
                pre { (detail) }
            }
        },
    )
}
