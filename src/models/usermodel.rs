use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    Client,
    Freelancer,
    Admin,
}

impl UserType {
    pub fn to_str(&self) -> &str {
        match self {
            UserType::Client => "client",
            UserType::Freelancer => "freelancer",
            UserType::Admin => "admin",
        }
    }
}

/// The persisted user record written at login. Read-only from this crate's
/// perspective; the login and logout flows own it.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub user_type: UserType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
