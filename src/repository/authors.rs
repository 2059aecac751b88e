//! Author queries on Repository

use uuid::Uuid;

use super::{Filter, Repository};
use crate::{error::AppResult, models::Book};

impl Repository {
    /// Books written by an author
    pub async fn authors_books(&self, author_id: Uuid) -> AppResult<Vec<Book>> {
        self.list_where(Filter::reference("author", author_id)).await
    }
}
