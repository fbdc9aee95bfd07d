//! Client-side core of the Frelanci freelance marketplace: session
//! identity, the polling order-conversation engine, and the one-way
//! payment-confirmation flow, built as thin logic over the marketplace
//! REST API. The backend owns every record; this crate only reads
//! snapshots and posts user actions back.

pub mod api;
pub mod config;
pub mod dtos;
pub mod error;
pub mod models;
pub mod service;
pub mod session;
pub mod utils;

pub use api::client::ApiClient;
pub use api::orders::OrderApi;
pub use config::Config;
pub use error::ApiError;
pub use service::conversation::{ConversationEngine, MessageStyle, PollGuard};
pub use service::error::ServiceError;
pub use session::SessionStore;
