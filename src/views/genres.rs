//! Genre pages

use maud::{html, Markup};

use super::{delete_form, failures, layout, stored};
use crate::{
    models::{Book, Genre, Model},
    services::genres::{GenreDetail, GenreFormPage},
};

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

pub fn list(genres: &[Genre]) -> Markup {
    layout(
        "Genre List",
        html! {
            h1 { "Genre List" }
            @if genres.is_empty() {
                p { "There are no genres." }
            } @else {
                ul {
                    @for genre in genres {
                        li { a href=(genre.url()) { (stored(&genre.name)) } }
                    }
                }
            }
        },
    )
}

pub fn detail(detail: &GenreDetail) -> Markup {
    let genre = &detail.genre;
    layout(
        "Genre Detail",
        html! {
            h1 { "Genre: " (stored(&genre.name)) }
            div {
                h4 { "Books" }
                @if detail.books.is_empty() {
                    p { "This genre has no books." }
                } @else {
                    (book_entries(&detail.books))
                }
            }
            hr;
            p { a href={ (genre.url()) "/delete" } { "Delete genre" } }
            p { a href={ (genre.url()) "/update" } { "Update genre" } }
        },
    )
}

pub fn form(page: &GenreFormPage) -> Markup {
    layout(
        page.title,
        html! {
            h1 { (page.title) }
            (failures(&page.errors))
            form method="POST" {
                label for="name" { "Genre:" }
                input id="name" type="text" name="name" placeholder="Fantasy, Poetry etc."
                    value=(stored(&page.genre.name));
                button type="submit" { "Submit" }
            }
        },
    )
}

pub fn delete(detail: &GenreDetail) -> Markup {
    let genre = &detail.genre;
    let id = genre.id().map(|id| id.to_string()).unwrap_or_default();
    layout(
        "Delete Genre",
        html! {
            h1 { "Delete Genre: " (stored(&genre.name)) }
            @if !detail.books.is_empty() {
                p { strong { "These books are still tagged with this genre:" } }
                (book_entries(&detail.books))
            }
            p { "Do you really want to delete this Genre?" }
            (delete_form("genreid", &id))
        },
    )
}
