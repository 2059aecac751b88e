use maud::{html, Markup};

use super::layout;
use crate::services::catalog::CatalogCounts;

pub fn index(counts: &CatalogCounts) -> Markup {
    layout(
        "Local Library Home",
        html! {
            h1 { "Local Library Home" }
            p { "Welcome to " em { "LocalLibrary" } ", a very basic library catalog." }
            h2 { "Dynamic content" }
            p { "The library has the following record counts:" }
            ul {
                li { strong { "Books: " } (counts.books) }
                li { strong { "Copies: " } (counts.copies) }
                li { strong { "Copies available: " } (counts.available_copies) }
                li { strong { "Authors: " } (counts.authors) }
                li { strong { "Genres: " } (counts.genres) }
            }
        },
    )
}
