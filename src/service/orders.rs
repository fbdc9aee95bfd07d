// service/orders.rs
use std::sync::Arc;

use uuid::Uuid;

use crate::api::orders::OrderApi;
use crate::models::ordermodel::Order;
use crate::service::error::ServiceError;

/// Backing logic for the order-list screen: fetch the viewer's orders and
/// hide entries from their own view.
pub struct OrderListService<A> {
    api: Arc<A>,
}

impl<A: OrderApi> OrderListService<A> {
    pub fn new(api: Arc<A>) -> Self {
        OrderListService { api }
    }

    /// Orders visible to the current participant, newest first.
    pub async fn my_orders(&self) -> Result<Vec<Order>, ServiceError> {
        let mut orders = self.api.my_orders().await?;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    /// Soft-delete: the server flips the viewer's own `deletedBy*` flag.
    /// The counterpart's list and the canonical record are untouched.
    pub async fn remove(&self, order_id: Uuid) -> Result<(), ServiceError> {
        self.api.delete_order(order_id).await?;
        Ok(())
    }
}
