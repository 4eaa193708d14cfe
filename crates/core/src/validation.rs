//! Bridges `validator` derive output into [`CoreError::Validation`].
//!
//! Field messages are declared on the input structs themselves, so callers
//! receive the fixed human-readable text for each failing field.

use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::CoreError;

/// Run the derived validation rules for `input`.
///
/// All field messages are joined with `"; "` in field-name order.
pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|errors| CoreError::Validation(collect_messages(&errors).join("; ")))
}

/// Field rule rejecting empty and whitespace-only text.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Flatten field errors into their messages, sorted by field name.
///
/// Errors declared without a `message` fall back to `"<field> is invalid"`.
pub fn collect_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<(String, Vec<String>)> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let field = field.to_string();
            let messages = errs
                .iter()
                .map(|e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{field} is invalid"),
                })
                .collect();
            (field, messages)
        })
        .collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));
    fields.into_iter().flat_map(|(_, msgs)| msgs).collect()
}
