//! Field rules for user payloads.
//!
//! The rules themselves are `#[validate(...)]` attributes on the payload
//! types in `core::models::user`; the functions here are the custom checks
//! those attributes call plus the conversion of `ValidationErrors` into a
//! `LinkorError`.

use validator::{Validate, ValidateUrl, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::constants::MAX_LIST_LIMIT;
use crate::core::errors::LinkorError;
use crate::core::models::{NewUser, UserUpdate};

fn rule_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// Optional leading `+`, then digits, spaces, dashes and parentheses.
pub fn validate_phone_number(phone: &str) -> Result<(), ValidationError> {
    let rest = phone.strip_prefix('+').unwrap_or(phone);
    let allowed = !rest.is_empty()
        && rest
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_whitespace() || c == '-' || c == '(' || c == ')');
    if !allowed {
        return Err(rule_error("phone", "Please enter a valid phone number"));
    }
    Ok(())
}

/// ASCII letters and whitespace only.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(rule_error("name", "Name is required"));
    }
    if !name.chars().all(|c| c.is_ascii_alphabetic() || c.is_whitespace()) {
        return Err(rule_error("name", "Name can only contain letters and spaces"));
    }
    Ok(())
}

/// Empty is accepted; anything else has to parse as an absolute URL.
pub fn validate_link(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.validate_url() {
        return Ok(());
    }
    Err(rule_error("url", "Please enter a valid URL"))
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Walks nested structs and lists; fields are visited in name order so the
/// reported field does not depend on hash order.
fn first_field_error(errors: &ValidationErrors) -> Option<(&'static str, &ValidationError)> {
    let mut fields: Vec<_> = errors.errors().iter().collect();
    fields.sort_by_key(|(name, _)| **name);
    for (name, kind) in fields {
        let found = match kind {
            ValidationErrorsKind::Field(errs) => errs.first().map(|e| (*name, e)),
            ValidationErrorsKind::Struct(inner) => first_field_error(inner),
            ValidationErrorsKind::List(items) => items.values().find_map(|inner| first_field_error(inner)),
        };
        if found.is_some() {
            return found;
        }
    }
    None
}

fn to_linkor_error(errors: ValidationErrors, email: Option<&str>) -> LinkorError {
    let Some((field, error)) = first_field_error(&errors) else {
        return LinkorError::invalid_input("body", "Invalid body", errors.to_string());
    };
    if let ("email", Some(email)) = (field, email) {
        return LinkorError::InvalidEmail(email.to_string());
    }
    let field = camel_case(field);
    let description = error
        .message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| format!("{} is invalid", field));
    LinkorError::invalid_input(&field, format!("Invalid {}", field), description)
}

fn require_email(email: &str) -> Result<(), LinkorError> {
    if email.trim().is_empty() {
        return Err(LinkorError::MissingEmail);
    }
    Ok(())
}

pub fn validate_new_user(data: &NewUser) -> Result<(), LinkorError> {
    require_email(&data.email)?;
    data.validate().map_err(|e| to_linkor_error(e, Some(&data.email)))
}

/// Only the fields present in the update are checked.
pub fn validate_update(update: &UserUpdate) -> Result<(), LinkorError> {
    if let Some(email) = &update.email {
        require_email(email)?;
    }
    update
        .validate()
        .map_err(|e| to_linkor_error(e, update.email.as_deref()))
}

pub fn validate_list_limit(limit: usize) -> Result<(), LinkorError> {
    if limit == 0 || limit > MAX_LIST_LIMIT {
        return Err(LinkorError::invalid_input(
            "limit",
            "Invalid limit",
            format!("limit must be between 1 and {}", MAX_LIST_LIMIT),
        ));
    }
    Ok(())
}
