//! Author pages

use maud::{html, Markup};

use super::{delete_form, failures, layout, stored};
use crate::{
    models::{Author, Book, Model},
    services::authors::{AuthorDetail, AuthorFormPage},
};

fn lifespan(author: &Author) -> Markup {
    html! {
        @let lifespan = author.lifespan();
        @if !lifespan.is_empty() {
            " (" (lifespan) ")"
        }
    }
}

fn book_entries(books: &[Book]) -> Markup {
    html! {
        dl {
            @for book in books {
                dt { a href=(book.url()) { (stored(&book.title)) } }
                dd { (stored(&book.summary)) }
            }
        }
    }
}

pub fn list(authors: &[Author]) -> Markup {
    layout(
        "Author List",
        html! {
            h1 { "Author List" }
            @if authors.is_empty() {
                p { "There are no authors." }
            } @else {
                ul {
                    @for author in authors {
                        li {
                            a href=(author.url()) { (stored(&author.name())) }
                            (lifespan(author))
                        }
                    }
                }
            }
        },
    )
}

pub fn detail(detail: &AuthorDetail) -> Markup {
    let author = &detail.author;
    layout(
        "Author Detail",
        html! {
            h1 { "Author: " (stored(&author.name())) }
            p { (author.lifespan()) }
            div {
                h4 { "Books" }
                @if detail.books.is_empty() {
                    p { "This author has no books." }
                } @else {
                    (book_entries(&detail.books))
                }
            }
            hr;
            p { a href={ (author.url()) "/delete" } { "Delete author" } }
            p { a href={ (author.url()) "/update" } { "Update author" } }
        },
    )
}

pub fn form(page: &AuthorFormPage) -> Markup {
    let author = &page.author;
    layout(
        page.title,
        html! {
            h1 { (page.title) }
            (failures(&page.errors))
            form method="POST" {
                label for="first_name" { "First Name:" }
                input id="first_name" type="text" name="first_name" placeholder="First name"
                    value=(stored(&author.first_name));
                label for="family_name" { "Family Name:" }
                input id="family_name" type="text" name="family_name" placeholder="Family name"
                    value=(stored(&author.family_name));
                label for="date_of_birth" { "Date of birth:" }
                input id="date_of_birth" type="date" name="date_of_birth" value=(author.date_of_birth);
                label for="date_of_death" { "Date of death:" }
                input id="date_of_death" type="date" name="date_of_death" value=(author.date_of_death);
                button type="submit" { "Submit" }
            }
        },
    )
}

/// Confirmation page. Books by the author are listed so the visitor sees
/// what would be left without one.
pub fn delete(detail: &AuthorDetail) -> Markup {
    let author = &detail.author;
    let id = author.id().map(|id| id.to_string()).unwrap_or_default();
    layout(
        "Delete Author",
        html! {
            h1 { "Delete Author: " (stored(&author.name())) }
            p { (author.lifespan()) }
            @if !detail.books.is_empty() {
                p { strong { "These books still reference this author:" } }
                (book_entries(&detail.books))
            }
            p { "Do you really want to delete this Author?" }
            (delete_form("authorid", &id))
        },
    )
}
