// dtos/orderdtos.rs
use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::ordermodel::MediaType;

/// Body of `POST /orders/:id/message`.
#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageDto {
    #[validate(length(max = 5000, message = "Message must be at most 5000 characters"))]
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaType>,
}

impl SendMessageDto {
    pub fn text(message: impl Into<String>) -> Self {
        SendMessageDto {
            message: message.into(),
            media_url: None,
            media_type: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.message.trim().is_empty() && self.media_url.is_none()
    }

    // Cross-field rules the derive cannot express.
    pub fn validate_payload(&self) -> Result<(), ValidationError> {
        if self.is_empty() {
            let mut error = ValidationError::new("empty_message");
            error.message = Some(Cow::from("Message text or media is required"));
            return Err(error);
        }
        if self.media_url.is_some() && self.media_type.is_none() {
            let mut error = ValidationError::new("media_type_missing");
            error.message = Some(Cow::from("Media type is required when media is attached"));
            return Err(error);
        }
        Ok(())
    }
}

/// Generic `{ "message": ... }` body the backend uses for delete
/// confirmations and error responses.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ApiMessage {
    pub message: String,
}
