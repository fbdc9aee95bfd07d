// service/payment.rs
use crate::api::orders::OrderApi;
use crate::models::ordermodel::Order;
use crate::models::usermodel::SessionUser;
use crate::service::error::ServiceError;

/// Payment confirmation is a one-way switch: once the freelancer marks the
/// off-platform payment as received, the order can never return to unpaid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentState {
    Unpaid,
    Paid,
}

impl PaymentState {
    pub fn from_order(order: &Order) -> Self {
        if order.payment_approved {
            PaymentState::Paid
        } else {
            PaymentState::Unpaid
        }
    }

    pub fn is_valid_transition(&self, to: PaymentState) -> bool {
        matches!((self, to), (PaymentState::Unpaid, PaymentState::Paid))
    }
}

/// Whether the confirm affordance should be offered at all: the viewer must
/// be the order's freelancer and the order still unpaid.
pub fn can_confirm(order: &Order, viewer: &SessionUser) -> bool {
    viewer.id == order.freelancer.id && PaymentState::from_order(order) == PaymentState::Unpaid
}

/// Request the payment-approval transition for `order`.
///
/// The local checks mirror the server's and keep an unauthorized or
/// duplicate call off the wire, but the server stays authoritative: its
/// rejection is surfaced verbatim, and on success nothing is flipped
/// locally. The approved flag and the system message it appends arrive
/// with the next reload, so the local snapshot never diverges from the
/// server record.
pub async fn confirm<A>(api: &A, order: &Order, viewer: &SessionUser) -> Result<(), ServiceError>
where
    A: OrderApi + ?Sized,
{
    if viewer.id != order.freelancer.id {
        return Err(ServiceError::NotOrderFreelancer(viewer.id, order.id));
    }
    if !PaymentState::from_order(order).is_valid_transition(PaymentState::Paid) {
        return Err(ServiceError::PaymentAlreadyConfirmed(order.id));
    }

    api.approve_payment(order.id).await?;
    Ok(())
}
