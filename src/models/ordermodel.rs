// models/ordermodel.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::usermodel::UserType;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    InProgress,
    Delivered,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn to_str(&self) -> &str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::InProgress => "in_progress",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    pub fn to_str(&self) -> &str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
        }
    }
}

/// Single attachment on a message. Images arrive as base64 data URIs,
/// videos as the sender's device URI.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MessageMedia {
    pub url: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
}

/// One entry in an order's conversation. Sender fields are snapshots taken
/// at send time, not live references to the user record.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub sender_id: Uuid,
    pub sender_name: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<MessageMedia>,
    #[serde(default)]
    pub is_system_message: bool,
    pub created_at: DateTime<Utc>,
}

/// Denormalized participant snapshot the server embeds in the order.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantRef {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JobRef {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(rename = "jobId", default, skip_serializing_if = "Option::is_none")]
    pub job: Option<JobRef>,
    #[serde(rename = "clientId")]
    pub client: ParticipantRef,
    #[serde(rename = "freelancerId")]
    pub freelancer: ParticipantRef,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_approved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_approved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub deleted_by_client: bool,
    #[serde(default)]
    pub deleted_by_freelancer: bool,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn is_participant(&self, user_id: Uuid) -> bool {
        self.client.id == user_id || self.freelancer.id == user_id
    }

    /// Which side of the order a user sits on, if any.
    pub fn participant_role(&self, user_id: Uuid) -> Option<UserType> {
        if self.client.id == user_id {
            Some(UserType::Client)
        } else if self.freelancer.id == user_id {
            Some(UserType::Freelancer)
        } else {
            None
        }
    }

    pub fn counterpart_of(&self, user_id: Uuid) -> Option<&ParticipantRef> {
        match self.participant_role(user_id)? {
            UserType::Client => Some(&self.freelancer),
            UserType::Freelancer => Some(&self.client),
            UserType::Admin => None,
        }
    }
}
