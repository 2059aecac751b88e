//! Form processing: sanitization, validation rules and failure collection
//!
//! Every create/update form goes through the same steps. The raw request
//! body is deserialized into a per-entity form struct, trimmed into a
//! [`FormInput`], validated, then HTML-escaped. The outcome is a
//! [`Submission`] holding the sanitized input and the ordered failures.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::{parse_date, parse_id, BookStatus};

pub static ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9A-Za-z]+$").expect("valid alphanumeric pattern"));

/// One failed rule, reported against the field it checked
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldFailure {
    pub field: &'static str,
    pub message: String,
}

/// Sanitized, typed input of one entity form
pub trait FormInput: Validate + Sized {
    /// Field names in form order; failures are reported in this order
    const FIELDS: &'static [&'static str];

    /// Replace free-text values with their HTML-escaped form
    fn escaped(self) -> Self;
}

/// Result of running a form through sanitization and validation
#[derive(Debug, Clone)]
pub struct Submission<I> {
    /// Trimmed and escaped values, kept so the form can be re-rendered
    pub input: I,
    pub failures: Vec<FieldFailure>,
}

impl<I: FormInput> Submission<I> {
    /// Validate trimmed input, then escape it. All rules run.
    pub fn new(trimmed: I) -> Self {
        let failures = match trimmed.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => ordered_failures(&errors, I::FIELDS),
        };
        Self {
            input: trimmed.escaped(),
            failures,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Flatten validator errors into a list ordered by `fields`
pub fn ordered_failures(errors: &ValidationErrors, fields: &[&'static str]) -> Vec<FieldFailure> {
    let by_field = errors.field_errors();
    fields
        .iter()
        .copied()
        .flat_map(|field| {
            by_field
                .get(field)
                .into_iter()
                .flat_map(|errs| errs.iter())
                .map(move |err| FieldFailure {
                    field,
                    message: err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}", field)),
                })
        })
        .collect()
}

/// HTML-escape a value the way form sanitizers usually do
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '/' => out.push_str("&#x2F;"),
            '\\' => out.push_str("&#x5C;"),
            '`' => out.push_str("&#96;"),
            _ => out.push(c),
        }
    }
    out
}

fn failure(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Optional ISO-8601 date: empty passes, otherwise it must parse
pub fn iso8601_date(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || parse_date(value).is_some() {
        Ok(())
    } else {
        Err(failure("iso8601", "Invalid date"))
    }
}

/// Reference to another record. Emptiness is checked by a length rule.
pub fn reference_id(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || parse_id(value).is_some() {
        Ok(())
    } else {
        Err(failure("reference", "Invalid reference"))
    }
}

pub fn reference_ids(values: &[String]) -> Result<(), ValidationError> {
    if values.iter().all(|v| parse_id(v).is_some()) {
        Ok(())
    } else {
        Err(failure("reference", "Invalid reference"))
    }
}

/// Copy status. Empty means the default status.
pub fn book_status(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.parse::<BookStatus>().is_ok() {
        Ok(())
    } else {
        Err(failure("status", "Invalid status"))
    }
}
