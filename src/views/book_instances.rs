//! Book instance (copy) pages

use maud::{html, Markup};

use super::{delete_form, failures, layout, stored};
use crate::{
    models::{BookInstanceWithBook, BookStatus, Model},
    services::book_instances::BookInstanceFormPage,
};

/// Status word coloured by availability
pub fn status_badge(status: BookStatus) -> Markup {
    let class = format!("status-{}", status.as_str().to_lowercase());
    html! {
        span class=(class) { (status.as_str()) }
    }
}

fn book_link(entry: &BookInstanceWithBook) -> Markup {
    html! {
        @match &entry.book {
            Some(book) => {
                a href=(book.url()) { (stored(&book.title)) }
            },
            None => { (entry.book_title()) },
        }
    }
}

pub fn list(instances: &[BookInstanceWithBook]) -> Markup {
    layout(
        "Book Instance List",
        html! {
            h1 { "Book Instance List" }
            @if instances.is_empty() {
                p { "There are no book copies in this library." }
            } @else {
                ul {
                    @for entry in instances {
                        @let copy = &entry.instance;
                        li {
                            a href=(copy.url()) { (book_link_text(entry)) " : " (stored(&copy.imprint)) }
                            " - " (status_badge(copy.status))
                            @if copy.status != BookStatus::Available && copy.due_back.is_some() {
                                span { " (Due: " (copy.due_back_formatted()) ")" }
                            }
                        }
                    }
                }
            }
        },
    )
}

fn book_link_text(entry: &BookInstanceWithBook) -> Markup {
    html! {
        @match &entry.book {
            Some(book) => { (stored(&book.title)) },
            None => { (entry.book_title()) },
        }
    }
}

pub fn detail(entry: &BookInstanceWithBook) -> Markup {
    let copy = &entry.instance;
    let title = format!("Copy: {}", entry.book_title());
    layout(
        &title,
        html! {
            h1 { "ID: " (copy.id.map(|id| id.to_string()).unwrap_or_default()) }
            p { strong { "Title: " } (book_link(entry)) }
            p { strong { "Imprint: " } (stored(&copy.imprint)) }
            p { strong { "Status: " } (status_badge(copy.status)) }
            @if copy.status != BookStatus::Available && copy.due_back.is_some() {
                p { strong { "Due back: " } (copy.due_back_formatted()) }
            }
            hr;
            p { a href={ (copy.url()) "/delete" } { "Delete BookInstance" } }
            p { a href={ (copy.url()) "/update" } { "Update BookInstance" } }
        },
    )
}

pub fn form(page: &BookInstanceFormPage) -> Markup {
    let input = &page.instance;
    let selected_book = input.selected_book();
    let status = if input.status.is_empty() {
        BookStatus::default().as_str()
    } else {
        input.status.as_str()
    };
    layout(
        page.title,
        html! {
            h1 { (page.title) }
            (failures(&page.errors))
            form method="POST" {
                label for="book" { "Book:" }
                select id="book" name="book" {
                    option value="" { "--Please select a book--" }
                    @for book in &page.book_list {
                        option value=(book.id.to_string()) selected[selected_book == Some(book.id)] {
                            (stored(&book.title))
                        }
                    }
                }
                label for="imprint" { "Imprint:" }
                input id="imprint" type="text" name="imprint" placeholder="Publisher and date information"
                    value=(stored(&input.imprint));
                label for="due_back" { "Date when book available:" }
                input id="due_back" type="date" name="due_back" value=(input.due_back);
                label for="status" { "Status:" }
                select id="status" name="status" {
                    @for choice in BookStatus::ALL {
                        option value=(choice.as_str()) selected[status == choice.as_str()] {
                            (choice.as_str())
                        }
                    }
                }
                button type="submit" { "Submit" }
            }
        },
    )
}

pub fn delete(entry: &BookInstanceWithBook) -> Markup {
    let copy = &entry.instance;
    let id = copy.id().map(|id| id.to_string()).unwrap_or_default();
    layout(
        "Delete BookInstance",
        html! {
            h1 { "Delete BookInstance" }
            p { "Do you really want to delete this BookInstance?" }
            div {
                p { strong { "ID: " } (id) }
                p { strong { "Title: " } (book_link(entry)) }
                p { strong { "Imprint: " } (stored(&copy.imprint)) }
                p { strong { "Status: " } (status_badge(copy.status)) }
            }
            (delete_form("bookinstanceid", &id))
        },
    )
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::*;
    use crate::models::{Book, BookInstance, BookInstanceInput, BookTitle};

    fn entry(book: Option<Book>, status: BookStatus) -> BookInstanceWithBook {
        BookInstanceWithBook {
            instance: BookInstance {
                id: Some(Uuid::new_v4()),
                book: Uuid::new_v4(),
                imprint: "Gollancz, 2011".to_string(),
                status,
                due_back: NaiveDate::from_ymd_opt(2020, 10, 6),
            },
            book,
        }
    }

    fn book(title: &str) -> Book {
        Book {
            id: Some(Uuid::new_v4()),
            title: title.to_string(),
            author: Uuid::new_v4(),
            summary: String::new(),
            isbn: String::new(),
            genre: Vec::new(),
        }
    }

    #[test]
    fn detail_title_names_the_book() {
        let html = detail(&entry(Some(book("The Name of the Wind")), BookStatus::Loaned)).into_string();
        assert!(html.contains("<title>Copy: The Name of the Wind</title>"));
        assert!(html.contains("Oct 6, 2020"));
        assert!(html.contains("status-loaned"));
    }

    #[test]
    fn available_copy_hides_due_date() {
        let html = list(&[entry(Some(book("Dune")), BookStatus::Available)]).into_string();
        assert!(!html.contains("Due:"));
    }

    #[test]
    fn missing_book_gets_placeholder() {
        let html = list(&[entry(None, BookStatus::Maintenance)]).into_string();
        assert!(html.contains("(missing book)"));
    }

    #[test]
    fn form_defaults_to_maintenance() {
        let dune = BookTitle {
            id: Uuid::new_v4(),
            title: "Dune".to_string(),
        };
        let page = BookInstanceFormPage {
            title: "Create Book Instance",
            instance: BookInstanceInput::default(),
            book_list: vec![dune],
            errors: Vec::new(),
        };
        let html = form(&page).into_string();
        assert!(html.contains("value=\"Maintenance\" selected"));
        assert_eq!(html.matches(" selected").count(), 1);
    }
}
