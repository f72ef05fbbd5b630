use anyhow::anyhow;
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::utils::errors::AppError;

/// Flattens `validator` field errors into one comma-joined line, sorted by
/// field name so the output is stable across runs.
fn format_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(move |error| match &error.message {
                Some(msg) => msg.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect();
    messages.sort();
    messages.join(", ")
}

fn json_rejection_to_error(rejection: JsonRejection) -> AppError {
    if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
        return AppError::new(
            StatusCode::BAD_REQUEST,
            anyhow!("Missing 'Content-Type: application/json' header"),
        );
    }

    // serde_json's messages are the only handle we have on which field broke
    let body_text = rejection.body_text();
    let message = if let Some(rest) = body_text.split("missing field `").nth(1) {
        let field = rest.split('`').next().unwrap_or("unknown");
        format!("{field} is required")
    } else if body_text.contains("invalid type") {
        "Invalid field type in request".to_string()
    } else {
        "Invalid request body".to_string()
    };

    AppError::new(StatusCode::BAD_REQUEST, anyhow!(message))
}

/// JSON extractor that runs `validator` rules on the deserialized body and
/// rejects with a 400/422 before the handler runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection_to_error)?;

        value.validate().map_err(|errors| {
            AppError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                anyhow!("{}", format_errors(&errors)),
            )
        })?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::format_errors;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "Name cannot be blank"))]
        name: String,
        #[validate(range(min = 1, message = "Capacity must be positive"))]
        capacity: i32,
    }

    #[test]
    fn joins_messages_sorted() {
        let sample = Sample {
            name: String::new(),
            capacity: 0,
        };
        let errors = sample.validate().unwrap_err();
        assert_eq!(
            format_errors(&errors),
            "Capacity must be positive, Name cannot be blank"
        );
    }

    #[test]
    fn valid_input_produces_no_errors() {
        let sample = Sample {
            name: "Room 101".to_string(),
            capacity: 25,
        };
        assert!(sample.validate().is_ok());
    }
}
