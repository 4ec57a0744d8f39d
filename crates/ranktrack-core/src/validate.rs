//! Request validation: shape checks that must fail before any outbound
//! call is made.

use serde::Serialize;
use thiserror::Error;

use crate::models::{Device, LocationInput, RankingRequest};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Error)]
#[error("invalid request: {}", summarize(.fields))]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

fn summarize(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| format!("{}: {}", f.field, f.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// A request that has passed validation. Depth is resolved to a concrete
/// value and the keyword is trimmed.
#[derive(Debug, Clone)]
pub struct ValidRequest {
    pub keyword: String,
    pub location: LocationInput,
    pub device: Device,
    pub language_code: String,
    pub depth: u32,
}

/// Validates a raw [`RankingRequest`] against the configured depth bounds.
///
/// Collects every field violation rather than stopping at the first, so
/// clients see the full list in one round trip.
///
/// # Errors
///
/// Returns [`ValidationError`] with one [`FieldError`] per violation:
/// empty/whitespace keyword, no non-empty location field, or a depth of
/// zero or above `max_depth`.
pub fn validate_request(
    request: &RankingRequest,
    default_depth: u32,
    max_depth: u32,
) -> Result<ValidRequest, ValidationError> {
    let mut fields = Vec::new();

    let keyword = request.keyword.trim();
    if keyword.is_empty() {
        fields.push(FieldError {
            field: "keyword".to_string(),
            message: "keyword cannot be empty".to_string(),
        });
    }

    if request.location.query_string().is_empty() {
        fields.push(FieldError {
            field: "location".to_string(),
            message: "at least one of address, pincode, or city is required".to_string(),
        });
    }

    let depth = request.depth.unwrap_or(default_depth);
    if depth == 0 || depth > max_depth {
        fields.push(FieldError {
            field: "depth".to_string(),
            message: format!("depth must be between 1 and {max_depth}"),
        });
    }

    if !fields.is_empty() {
        return Err(ValidationError { fields });
    }

    Ok(ValidRequest {
        keyword: keyword.to_string(),
        location: request.location.clone(),
        device: request.device,
        language_code: request.language_code.clone(),
        depth,
    })
}
