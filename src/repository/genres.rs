//! Genre queries on Repository

use uuid::Uuid;

use super::{Filter, Repository};
use crate::{error::AppResult, models::Book};

impl Repository {
    /// Books tagged with a genre
    pub async fn genres_books(&self, genre_id: Uuid) -> AppResult<Vec<Book>> {
        self.list_where(Filter::reference("genre", genre_id)).await
    }
}
