//! Genre model

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::Model;
use crate::forms::{self, FormInput};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub name: String,
}

impl Model for Genre {
    const COLLECTION: &'static str = "genres";
    const SEGMENT: &'static str = "genre";

    fn id(&self) -> Option<Uuid> {
        self.id
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GenreForm {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct GenreInput {
    #[validate(length(
        min = 3,
        max = 100,
        message = "Genre name must contain between 3 and 100 characters"
    ))]
    pub name: String,
}

impl From<GenreForm> for GenreInput {
    fn from(form: GenreForm) -> Self {
        Self {
            name: form.name.trim().to_string(),
        }
    }
}

impl From<&Genre> for GenreInput {
    fn from(genre: &Genre) -> Self {
        Self {
            name: genre.name.clone(),
        }
    }
}

impl FormInput for GenreInput {
    const FIELDS: &'static [&'static str] = &["name"];

    fn escaped(self) -> Self {
        Self {
            name: forms::escape(&self.name),
        }
    }
}

impl GenreInput {
    pub fn into_genre(self, id: Option<Uuid>) -> Genre {
        Genre {
            id,
            name: self.name,
        }
    }
}
