//! Form validation.
//!
//! Rules report message keys rather than text so the rendering layer can
//! localize them through [`crate::i18n::Messages`].

use crate::api::{
    BoolValueData, CollectionData, DateTimeValueData, IntValueData, ItemRequest, LoginRequest,
    RegisterRequest, StringValueData,
};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use thiserror::Error;

/// Message keys
pub mod keys {
    /// Missing or blank value
    pub const REQUIRED: &str = "validation.required";
    /// Malformed email address
    pub const EMAIL: &str = "validation.email";
    /// Below the allowed range
    pub const MIN: &str = "validation.min";
    /// Above the allowed range
    pub const MAX: &str = "validation.max";
    /// A list that needs at least one entry
    pub const MUST_NOT_BE_EMPTY: &str = "validation.must-not-be-empty";
}

/// One failed rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Path of the offending field, e.g. `fields[2].name`
    pub field: String,
    /// Message key
    pub key: &'static str,
}

/// Every rule a form failed
#[derive(Debug, Clone, PartialEq, Eq, Default, Error)]
#[error("Form is invalid: {}", summary(.errors))]
pub struct ValidationError {
    /// Failed rules in field order
    pub errors: Vec<FieldError>,
}

fn summary(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{} ({})", e.field, e.key))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationError {
    /// Message key of the first failure of `field`
    #[must_use]
    pub fn key_for(&self, field: &str) -> Option<&'static str> {
        self.errors.iter().find(|e| e.field == field).map(|e| e.key)
    }
}

#[derive(Default)]
struct Rules {
    errors: Vec<FieldError>,
}

impl Rules {
    fn fail(&mut self, field: impl Into<String>, key: &'static str) {
        self.errors.push(FieldError {
            field: field.into(),
            key,
        });
    }

    fn required(&mut self, field: impl Into<String>, value: &str) -> bool {
        if value.trim().is_empty() {
            self.fail(field, keys::REQUIRED);
            return false;
        }
        true
    }

    fn finish(self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                errors: self.errors,
            })
        }
    }
}

fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !value.chars().any(char::is_whitespace)
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

fn check_credentials(rules: &mut Rules, email: &str, password: &str) {
    if rules.required("email", email) && !is_email(email.trim()) {
        rules.fail("email", keys::EMAIL);
    }
    rules.required("password", password);
}

/// Login form: a valid email and a non-empty password
///
/// # Errors
///
/// Returns every failed rule.
pub fn validate_login(form: &LoginRequest) -> Result<(), ValidationError> {
    let mut rules = Rules::default();
    check_credentials(&mut rules, &form.email, &form.password);
    rules.finish()
}

/// Register form: the login rules plus a non-empty name
///
/// # Errors
///
/// Returns every failed rule.
pub fn validate_register(form: &RegisterRequest) -> Result<(), ValidationError> {
    let mut rules = Rules::default();
    check_credentials(&mut rules, &form.email, &form.password);
    rules.required("name", &form.name);
    rules.finish()
}

/// Collection form
///
/// Name and description are required, the topic must lie within the range
/// of `topic_ids` (skipped while topics are unknown), and there must be at
/// least one field, each with a name. Field types are valid by construction.
///
/// # Errors
///
/// Returns every failed rule.
pub fn validate_collection(form: &CollectionData, topic_ids: &[i64]) -> Result<(), ValidationError> {
    let mut rules = Rules::default();

    rules.required("name", &form.name);
    rules.required("description", &form.description);

    if let (Some(min), Some(max)) = (topic_ids.iter().min(), topic_ids.iter().max()) {
        if form.topic_id < *min {
            rules.fail("topicId", keys::MIN);
        } else if form.topic_id > *max {
            rules.fail("topicId", keys::MAX);
        }
    }

    if form.fields.is_empty() {
        rules.fail("fields", keys::MUST_NOT_BE_EMPTY);
    }
    for (index, field) in form.fields.iter().enumerate() {
        rules.required(format!("fields[{index}].name"), &field.name);
    }

    rules.finish()
}

/// Integer field as entered, `None` when left blank
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntInput {
    /// Field id
    pub field_id: i64,
    /// Entered value
    pub value: Option<i64>,
}

/// Item form as entered
///
/// Dates are `YYYY-MM-DD` (or full ISO timestamps when unchanged from an
/// edited item).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemForm {
    /// Name
    pub name: String,
    /// Tags
    pub tags: Vec<String>,
    /// Integer values
    pub int_fields: Vec<IntInput>,
    /// Checkbox values
    pub bool_fields: Vec<BoolValueData>,
    /// Text values
    pub string_fields: Vec<StringValueData>,
    /// Date values
    pub date_time_fields: Vec<DateTimeValueData>,
}

/// Date entered in a form as an ISO-8601 UTC timestamp
fn to_timestamp(value: &str) -> Option<String> {
    let value = value.trim();
    let instant = match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => date.and_hms_opt(0, 0, 0)?.and_utc(),
        Err(_) => DateTime::parse_from_rfc3339(value).ok()?.with_timezone(&Utc),
    };
    Some(instant.to_rfc3339_opts(SecondsFormat::Millis, true))
}

impl ItemForm {
    /// Check the item rules: a name, plus a value for every integer, text
    /// and date field
    ///
    /// # Errors
    ///
    /// Returns every failed rule.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut rules = Rules::default();

        rules.required("name", &self.name);
        for (index, field) in self.int_fields.iter().enumerate() {
            if field.value.is_none() {
                rules.fail(format!("intFields[{index}].value"), keys::REQUIRED);
            }
        }
        for (index, field) in self.string_fields.iter().enumerate() {
            rules.required(format!("stringFields[{index}].value"), &field.value);
        }
        for (index, field) in self.date_time_fields.iter().enumerate() {
            let path = format!("dateTimeFields[{index}].value");
            if rules.required(path.clone(), &field.value) && to_timestamp(&field.value).is_none() {
                rules.fail(path, keys::REQUIRED);
            }
        }

        rules.finish()
    }

    /// Validate and convert into a request body
    ///
    /// `id` is set when editing an existing item. Dates become UTC midnight
    /// timestamps.
    ///
    /// # Errors
    ///
    /// Returns every failed rule.
    pub fn into_request(self, id: Option<i64>) -> Result<ItemRequest, ValidationError> {
        self.validate()?;

        Ok(ItemRequest {
            id,
            name: self.name.trim().to_string(),
            tags: self.tags,
            int_fields: self
                .int_fields
                .into_iter()
                .filter_map(|f| {
                    f.value.map(|value| IntValueData {
                        field_id: f.field_id,
                        value,
                    })
                })
                .collect(),
            bool_fields: self.bool_fields,
            string_fields: self.string_fields,
            date_time_fields: self
                .date_time_fields
                .into_iter()
                .filter_map(|f| {
                    to_timestamp(&f.value).map(|value| DateTimeValueData {
                        field_id: f.field_id,
                        value,
                    })
                })
                .collect(),
        })
    }
}

/// Tag input: non-blank
///
/// # Errors
///
/// Returns the failed rule.
pub fn validate_tag(value: &str) -> Result<(), ValidationError> {
    let mut rules = Rules::default();
    rules.required("value", value);
    rules.finish()
}

/// Comment input: non-blank
///
/// # Errors
///
/// Returns the failed rule.
pub fn validate_comment(text: &str) -> Result<(), ValidationError> {
    let mut rules = Rules::default();
    rules.required("text", text);
    rules.finish()
}
