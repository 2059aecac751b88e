//! Book pages

use maud::{html, Markup};

use super::{book_instances::status_badge, delete_form, failures, layout, stored};
use crate::{
    models::{BookInstance, BookWithAuthor, Model},
    services::books::{BookDetail, BookFormPage},
};

pub fn list(books: &[BookWithAuthor]) -> Markup {
    layout(
        "Book List",
        html! {
            h1 { "Book List" }
            @if books.is_empty() {
                p { "There are no books." }
            } @else {
                ul {
                    @for entry in books {
                        li {
                            a href=(entry.book.url()) { (stored(&entry.book.title)) }
                            @if let Some(author) = &entry.author {
                                " (" (stored(&author.name())) ")"
                            }
                        }
                    }
                }
            }
        },
    )
}

fn copies(instances: &[BookInstance]) -> Markup {
    html! {
        @for instance in instances {
            hr;
            p { (status_badge(instance.status)) }
            p { strong { "Imprint: " } (stored(&instance.imprint)) }
            @if instance.due_back.is_some() {
                p { strong { "Due back: " } (instance.due_back_formatted()) }
            }
            p { strong { "Id: " } a href=(instance.url()) { (instance.url()) } }
        }
    }
}

fn summary(detail: &BookDetail) -> Markup {
    let book = &detail.book;
    html! {
        p {
            strong { "Author: " }
            @match &detail.author {
                Some(author) => {
                    a href=(author.url()) { (stored(&author.name())) }
                },
                None => { "(unknown author)" },
            }
        }
        p { strong { "Summary: " } (stored(&book.summary)) }
        p { strong { "ISBN: " } (stored(&book.isbn)) }
        p {
            strong { "Genre: " }
            @for (i, genre) in detail.genres.iter().enumerate() {
                @if i > 0 { ", " }
                a href=(genre.url()) { (stored(&genre.name)) }
            }
        }
    }
}

pub fn detail(detail: &BookDetail) -> Markup {
    let book = &detail.book;
    layout(
        &book.title,
        html! {
            h1 { "Title: " (stored(&book.title)) }
            (summary(detail))
            div {
                h4 { "Copies" }
                @if detail.instances.is_empty() {
                    p { "There are no copies of this book in the library." }
                } @else {
                    (copies(&detail.instances))
                }
            }
            hr;
            p { a href={ (book.url()) "/delete" } { "Delete book" } }
            p { a href={ (book.url()) "/update" } { "Update book" } }
        },
    )
}

pub fn form(page: &BookFormPage) -> Markup {
    let book = &page.book;
    layout(
        page.title,
        html! {
            h1 { (page.title) }
            (failures(&page.errors))
            form method="POST" {
                label for="title" { "Title:" }
                input id="title" type="text" name="title" placeholder="Name of book"
                    value=(stored(&book.title));
                label for="author" { "Author:" }
                select id="author" name="author" {
                    option value="" { "--Please select an author--" }
                    @for author in &page.authors {
                        @let id = author.id.map(|id| id.to_string()).unwrap_or_default();
                        option value=(id) selected[book.author == id] { (stored(&author.name())) }
                    }
                }
                label for="summary" { "Summary:" }
                textarea id="summary" name="summary" placeholder="Summary" { (stored(&book.summary)) }
                label for="isbn" { "ISBN:" }
                input id="isbn" type="text" name="isbn" placeholder="ISBN13" value=(stored(&book.isbn));
                fieldset {
                    legend { "Genre:" }
                    @for genre in &page.genres {
                        @let id = genre.id.map(|id| id.to_string()).unwrap_or_default();
                        @let checked = genre.id.is_some_and(|id| book.has_genre(id));
                        label {
                            input type="checkbox" name="genre" value=(id) checked[checked];
                            " " (stored(&genre.name))
                        }
                    }
                }
                button type="submit" { "Submit" }
            }
        },
    )
}

/// Confirmation page listing the copies that would be left without a book
pub fn delete(detail: &BookDetail) -> Markup {
    let book = &detail.book;
    let id = book.id().map(|id| id.to_string()).unwrap_or_default();
    layout(
        "Delete Book",
        html! {
            h1 { "Delete Book: " (stored(&book.title)) }
            (summary(detail))
            @if !detail.instances.is_empty() {
                p { strong { "These copies still reference this book:" } }
                (copies(&detail.instances))
            }
            p { "Do you really want to delete this Book?" }
            (delete_form("bookid", &id))
        },
    )
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::models::{Author, Book, BookInput, Genre};

    fn author() -> Author {
        Author {
            id: Some(Uuid::new_v4()),
            first_name: "Ursula".to_string(),
            family_name: "LeGuin".to_string(),
            date_of_birth: None,
            date_of_death: None,
        }
    }

    fn genre(name: &str) -> Genre {
        Genre {
            id: Some(Uuid::new_v4()),
            name: name.to_string(),
        }
    }

    #[test]
    fn form_preselects_author_and_genres() {
        let chosen = author();
        let other = Author {
            id: Some(Uuid::new_v4()),
            ..author()
        };
        let fantasy = genre("Fantasy");
        let poetry = genre("Poetry");
        let page = BookFormPage {
            title: "Update Book",
            book: BookInput {
                title: "A Wizard of Earthsea".to_string(),
                author: chosen.id.unwrap().to_string(),
                summary: "Ged".to_string(),
                isbn: "1".to_string(),
                genre: vec![fantasy.id.unwrap().to_string()],
            },
            authors: vec![other, chosen.clone()],
            genres: vec![fantasy.clone(), poetry.clone()],
            errors: Vec::new(),
        };

        let html = form(&page).into_string();
        assert!(html.contains(&format!("value=\"{}\" selected", chosen.id.unwrap())));
        assert_eq!(html.matches(" selected").count(), 1);
        assert!(html.contains(&format!("value=\"{}\" checked", fantasy.id.unwrap())));
        assert!(!html.contains(&format!("value=\"{}\" checked", poetry.id.unwrap())));
    }

    #[test]
    fn detail_handles_missing_author() {
        let detail = BookDetail {
            book: Book {
                id: Some(Uuid::new_v4()),
                title: "Orphan".to_string(),
                author: Uuid::new_v4(),
                summary: "Lost".to_string(),
                isbn: "1".to_string(),
                genre: Vec::new(),
            },
            author: None,
            genres: Vec::new(),
            instances: Vec::new(),
        };
        let html = super::detail(&detail).into_string();
        assert!(html.contains("(unknown author)"));
        assert!(html.contains("There are no copies"));
    }
}
