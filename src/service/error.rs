use thiserror::Error;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("User {0} is not the freelancer on order {1}")]
    NotOrderFreelancer(Uuid, Uuid),

    #[error("Payment for order {0} is already confirmed")]
    PaymentAlreadyConfirmed(Uuid),

    #[error("No signed-in user: the conversation is read-only")]
    NoSession,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Media error: {0}")]
    Media(String),

    #[error("Api error: {0}")]
    Api(#[from] ApiError),
}

impl ServiceError {
    pub fn is_unauthorized(&self) -> bool {
        match self {
            ServiceError::Api(e) => matches!(e.status(), Some(401) | Some(403)),
            ServiceError::NotOrderFreelancer(_, _) => true,
            _ => false,
        }
    }
}
