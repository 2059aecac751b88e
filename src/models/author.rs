//! Author model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{format_date, parse_date, Model};
use crate::{
    error::{AppError, AppResult},
    forms::{self, FormInput, ALPHANUMERIC},
};

/// Full author record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub first_name: String,
    pub family_name: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub date_of_death: Option<NaiveDate>,
}

impl Model for Author {
    const COLLECTION: &'static str = "authors";
    const SEGMENT: &'static str = "author";

    fn id(&self) -> Option<Uuid> {
        self.id
    }
}

impl Author {
    /// Full name, family name first
    pub fn name(&self) -> String {
        format!("{}, {}", self.family_name, self.first_name)
    }

    /// Birth and death dates joined by a dash. Missing dates are left out
    /// and the dash only appears between two present dates.
    pub fn lifespan(&self) -> String {
        let mut lifespan = String::new();
        if let Some(born) = self.date_of_birth {
            lifespan.push_str(&format_date(born));
        }
        if let Some(died) = self.date_of_death {
            if !lifespan.is_empty() {
                lifespan.push_str(" - ");
            }
            lifespan.push_str(&format_date(died));
        }
        lifespan
    }
}

/// Author form as posted by the browser
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AuthorForm {
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: String,
    pub date_of_death: String,
}

/// Sanitized author form values
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct AuthorInput {
    #[validate(
        length(min = 1, message = "First name must be specified."),
        regex(path = *ALPHANUMERIC, message = "First name has non-alphanumeric characters."),
        custom(function = "first_name_limit")
    )]
    pub first_name: String,
    #[validate(
        length(min = 1, message = "Family name must be specified."),
        regex(path = *ALPHANUMERIC, message = "Family name has non-alphanumeric characters."),
        custom(function = "family_name_limit")
    )]
    pub family_name: String,
    #[validate(custom(function = "date_of_birth_rule"))]
    pub date_of_birth: String,
    #[validate(custom(function = "date_of_death_rule"))]
    pub date_of_death: String,
}

const NAME_MAX_CHARS: usize = 100;

fn name_limit(value: &str, message: &'static str) -> Result<(), validator::ValidationError> {
    if value.chars().count() <= NAME_MAX_CHARS {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("length");
        err.message = Some(message.into());
        Err(err)
    }
}

fn first_name_limit(value: &str) -> Result<(), validator::ValidationError> {
    name_limit(value, "First name must not exceed 100 characters.")
}

fn family_name_limit(value: &str) -> Result<(), validator::ValidationError> {
    name_limit(value, "Family name must not exceed 100 characters.")
}

fn date_of_birth_rule(value: &str) -> Result<(), validator::ValidationError> {
    forms::iso8601_date(value).map_err(|mut err| {
        err.message = Some("Invalid date of birth".into());
        err
    })
}

fn date_of_death_rule(value: &str) -> Result<(), validator::ValidationError> {
    forms::iso8601_date(value).map_err(|mut err| {
        err.message = Some("Invalid date of death".into());
        err
    })
}

impl From<AuthorForm> for AuthorInput {
    fn from(form: AuthorForm) -> Self {
        Self {
            first_name: form.first_name.trim().to_string(),
            family_name: form.family_name.trim().to_string(),
            date_of_birth: form.date_of_birth.trim().to_string(),
            date_of_death: form.date_of_death.trim().to_string(),
        }
    }
}

/// Prefill the form from a stored record
impl From<&Author> for AuthorInput {
    fn from(author: &Author) -> Self {
        Self {
            first_name: author.first_name.clone(),
            family_name: author.family_name.clone(),
            date_of_birth: author.date_of_birth.map(|d| d.to_string()).unwrap_or_default(),
            date_of_death: author.date_of_death.map(|d| d.to_string()).unwrap_or_default(),
        }
    }
}

impl FormInput for AuthorInput {
    const FIELDS: &'static [&'static str] =
        &["first_name", "family_name", "date_of_birth", "date_of_death"];

    fn escaped(self) -> Self {
        Self {
            first_name: forms::escape(&self.first_name),
            family_name: forms::escape(&self.family_name),
            ..self
        }
    }
}

impl AuthorInput {
    /// Build the record to persist. `id` is the identity to keep on update.
    pub fn into_author(self, id: Option<Uuid>) -> AppResult<Author> {
        Ok(Author {
            id,
            first_name: self.first_name,
            family_name: self.family_name,
            date_of_birth: optional_date(&self.date_of_birth)?,
            date_of_death: optional_date(&self.date_of_death)?,
        })
    }
}

pub(crate) fn optional_date(value: &str) -> AppResult<Option<NaiveDate>> {
    if value.is_empty() {
        return Ok(None);
    }
    parse_date(value)
        .map(Some)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid date: {}", value)))
}
