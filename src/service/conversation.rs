// service/conversation.rs
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::interval;
use uuid::Uuid;
use validator::Validate;

use crate::api::orders::OrderApi;
use crate::dtos::orderdtos::SendMessageDto;
use crate::models::ordermodel::{MediaType, Message, Order};
use crate::models::usermodel::SessionUser;
use crate::service::error::ServiceError;
use crate::service::payment;
use crate::session::SessionStore;
use crate::utils::media;

/// How a message should be rendered relative to the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStyle {
    System,
    Own,
    Theirs,
}

/// System entries first, then own vs counterpart by sender snapshot.
pub fn classify(message: &Message, viewer_id: Uuid) -> MessageStyle {
    if message.is_system_message {
        MessageStyle::System
    } else if message.sender_id == viewer_id {
        MessageStyle::Own
    } else {
        MessageStyle::Theirs
    }
}

/// Locally selected attachment, not yet encoded for the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftMedia {
    pub uri: String,
    pub media_type: MediaType,
}

#[derive(Debug, Default)]
struct ConversationState {
    order: Option<Order>,
    draft_message: String,
    draft_media: Option<DraftMedia>,
    sending: bool,
    applied_seq: u64,
}

struct EngineInner<A> {
    api: Arc<A>,
    viewer: SessionUser,
    order_id: Uuid,
    poll_interval: Duration,
    state: Mutex<ConversationState>,
    issued_seq: AtomicU64,
}

/// Client-side engine behind an order's conversation screen.
///
/// The order record is owned by the server; this engine only holds a read
/// snapshot replaced wholesale by `load`, which runs once up front, every
/// poll tick, and after every mutation. Messages are therefore always
/// displayed in the server's order and nothing is appended or flipped
/// optimistically.
pub struct ConversationEngine<A> {
    inner: Arc<EngineInner<A>>,
}

impl<A> Clone for ConversationEngine<A> {
    fn clone(&self) -> Self {
        ConversationEngine {
            inner: self.inner.clone(),
        }
    }
}

impl<A: OrderApi + 'static> ConversationEngine<A> {
    pub fn new(api: Arc<A>, viewer: SessionUser, order_id: Uuid, poll_interval: Duration) -> Self {
        ConversationEngine {
            inner: Arc::new(EngineInner {
                api,
                viewer,
                order_id,
                poll_interval,
                state: Mutex::new(ConversationState::default()),
                issued_seq: AtomicU64::new(0),
            }),
        }
    }

    /// Resolve the viewer from the persisted session. With no session the
    /// screen must not pretend to be a participant, so this fails instead
    /// of guessing.
    pub fn for_session(
        api: Arc<A>,
        session: &SessionStore,
        order_id: Uuid,
        poll_interval: Duration,
    ) -> Result<Self, ServiceError> {
        let viewer = session.current_user().ok_or(ServiceError::NoSession)?;
        Ok(Self::new(api, viewer, order_id, poll_interval))
    }

    pub fn viewer(&self) -> &SessionUser {
        &self.inner.viewer
    }

    pub fn order_id(&self) -> Uuid {
        self.inner.order_id
    }

    pub fn snapshot(&self) -> Option<Order> {
        self.inner.state.lock().unwrap().order.clone()
    }

    pub fn is_sending(&self) -> bool {
        self.inner.state.lock().unwrap().sending
    }

    pub fn set_draft_message(&self, text: impl Into<String>) {
        self.inner.state.lock().unwrap().draft_message = text.into();
    }

    pub fn draft_message(&self) -> String {
        self.inner.state.lock().unwrap().draft_message.clone()
    }

    pub fn attach_media(&self, uri: impl Into<String>, media_type: MediaType) {
        self.inner.state.lock().unwrap().draft_media = Some(DraftMedia {
            uri: uri.into(),
            media_type,
        });
    }

    pub fn clear_media(&self) {
        self.inner.state.lock().unwrap().draft_media = None;
    }

    pub fn draft_media(&self) -> Option<DraftMedia> {
        self.inner.state.lock().unwrap().draft_media.clone()
    }

    /// Fetch the order and replace the local snapshot.
    ///
    /// Responses are sequence-stamped: a slow response that arrives after a
    /// newer one has been applied is discarded, so an overlapping manual
    /// refresh cannot clobber fresher poll data. Failures are fatal only
    /// until the first snapshot exists; after that they are logged and the
    /// stale snapshot stays up for the next cycle to retry.
    pub async fn load(&self) -> Result<(), ServiceError> {
        let seq = self.inner.issued_seq.fetch_add(1, Ordering::SeqCst) + 1;
        match self.inner.api.get_order(self.inner.order_id).await {
            Ok(order) => {
                let mut state = self.inner.state.lock().unwrap();
                if seq > state.applied_seq {
                    state.applied_seq = seq;
                    state.order = Some(order);
                } else {
                    tracing::debug!(order_id = %self.inner.order_id, "Discarding stale order response");
                }
                Ok(())
            }
            Err(e) => {
                let loaded = self.inner.state.lock().unwrap().order.is_some();
                if loaded {
                    tracing::debug!(order_id = %self.inner.order_id, "Order refresh failed: {}", e);
                    Ok(())
                } else {
                    Err(e.into())
                }
            }
        }
    }

    /// Refresh the snapshot on a fixed cadence until the returned guard is
    /// dropped. The guard aborts the task, so navigating away releases the
    /// timer on every exit path.
    pub fn start_polling(&self) -> PollGuard {
        let engine = self.clone();
        let period = self.inner.poll_interval;
        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            // The first tick completes immediately; the caller has already
            // done the initial load.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let _ = engine.load().await;
            }
        });
        PollGuard { handle }
    }

    /// Submit the current draft.
    ///
    /// Returns `Ok(false)` without touching the network when there is
    /// nothing to send or another send is still in flight (double-taps
    /// collapse into one submission). On success the drafts are cleared and
    /// the order reloaded so the new message appears with its
    /// server-assigned position; on failure the drafts are left intact for
    /// a retry.
    pub async fn send(&self) -> Result<bool, ServiceError> {
        let (text, media_draft) = {
            let mut state = self.inner.state.lock().unwrap();
            if state.sending {
                return Ok(false);
            }
            let text = state.draft_message.trim().to_string();
            if text.is_empty() && state.draft_media.is_none() {
                return Ok(false);
            }
            state.sending = true;
            (text, state.draft_media.clone())
        };

        let result = self.submit(text, media_draft).await;
        self.inner.state.lock().unwrap().sending = false;
        result
    }

    async fn submit(
        &self,
        text: String,
        media_draft: Option<DraftMedia>,
    ) -> Result<bool, ServiceError> {
        let mut dto = SendMessageDto::text(text);
        if let Some(draft) = media_draft {
            let url = media::compose_media(&draft.uri, draft.media_type)
                .map_err(|e| ServiceError::Media(e.to_string()))?;
            dto.media_url = Some(url);
            dto.media_type = Some(draft.media_type);
        }
        dto.validate()
            .map_err(|e| ServiceError::Validation(e.to_string()))?;
        dto.validate_payload()
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        self.inner.api.send_message(self.inner.order_id, &dto).await?;

        {
            let mut state = self.inner.state.lock().unwrap();
            state.draft_message.clear();
            state.draft_media = None;
        }

        // Pick up the canonical ordering; if this refresh fails the next
        // poll cycle recovers it.
        let _ = self.load().await;
        Ok(true)
    }

    pub fn can_confirm_payment(&self) -> bool {
        let state = self.inner.state.lock().unwrap();
        match &state.order {
            Some(order) => payment::can_confirm(order, &self.inner.viewer),
            None => false,
        }
    }

    /// Freelancer-only payment confirmation followed by a reload, which is
    /// where the flipped flag and the server-authored system message come
    /// from.
    pub async fn confirm_payment(&self) -> Result<(), ServiceError> {
        let order = self
            .snapshot()
            .ok_or_else(|| ServiceError::Validation("Order is not loaded yet".to_string()))?;

        payment::confirm(self.inner.api.as_ref(), &order, &self.inner.viewer).await?;

        let _ = self.load().await;
        Ok(())
    }

    pub fn classify_message(&self, message: &Message) -> MessageStyle {
        classify(message, self.inner.viewer.id)
    }
}

/// Handle for the poll task; dropping it stops the polling.
pub struct PollGuard {
    handle: JoinHandle<()>,
}

impl PollGuard {
    pub fn stop(self) {}
}

impl Drop for PollGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
