// api/orders.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::client::ApiClient;
use crate::dtos::orderdtos::SendMessageDto;
use crate::error::ApiError;
use crate::models::ordermodel::Order;

/// Order endpoints consumed by the conversation and order-list services.
/// Implemented by [`ApiClient`] against the live backend, and by the
/// in-memory backend the tests run against.
#[async_trait]
pub trait OrderApi: Send + Sync {
    /// Full order record including the message thread.
    async fn get_order(&self, order_id: Uuid) -> Result<Order, ApiError>;

    /// Orders visible to the current participant.
    async fn my_orders(&self) -> Result<Vec<Order>, ApiError>;

    /// Append a message to the order's thread; returns the updated order.
    async fn send_message(&self, order_id: Uuid, dto: &SendMessageDto) -> Result<Order, ApiError>;

    /// Freelancer-only, one-way payment confirmation. The server flips
    /// `paymentApproved`, stamps `paymentApprovedAt` and appends the system
    /// message announcing the confirmation.
    async fn approve_payment(&self, order_id: Uuid) -> Result<Order, ApiError>;

    /// Soft-delete the order from the current participant's own list.
    async fn delete_order(&self, order_id: Uuid) -> Result<(), ApiError>;
}

#[async_trait]
impl OrderApi for ApiClient {
    async fn get_order(&self, order_id: Uuid) -> Result<Order, ApiError> {
        self.get_json(&format!("/orders/{}", order_id)).await
    }

    async fn my_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.get_json("/orders/my").await
    }

    async fn send_message(&self, order_id: Uuid, dto: &SendMessageDto) -> Result<Order, ApiError> {
        self.post_json(&format!("/orders/{}/message", order_id), dto)
            .await
    }

    async fn approve_payment(&self, order_id: Uuid) -> Result<Order, ApiError> {
        self.post_json(
            &format!("/orders/{}/approve-payment", order_id),
            &serde_json::json!({}),
        )
        .await
    }

    async fn delete_order(&self, order_id: Uuid) -> Result<(), ApiError> {
        self.delete(&format!("/orders/{}", order_id)).await
    }
}
