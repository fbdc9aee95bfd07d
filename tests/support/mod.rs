// Shared test harness: an in-memory stand-in for the marketplace backend.
// Engine tests talk to it directly through `OrderApi`; HTTP tests serve it
// behind an axum router that mimics the real REST surface.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use uuid::Uuid;

use frelanci_client::dtos::orderdtos::SendMessageDto;
use frelanci_client::error::ApiError;
use frelanci_client::models::ordermodel::{
    JobRef, MediaType, Message, MessageMedia, Order, OrderStatus, ParticipantRef,
};
use frelanci_client::models::usermodel::{SessionUser, UserType};
use frelanci_client::OrderApi;

pub const PAYMENT_CONFIRMED_TEXT: &str = "Payment confirmed by the freelancer";

#[derive(Default)]
struct BackendState {
    orders: HashMap<Uuid, Order>,
    get_count: usize,
    send_count: usize,
    fail_gets: usize,
    fail_sends: usize,
    get_delays: VecDeque<Duration>,
    send_delay: Option<Duration>,
}

/// In-memory order store with the server-side semantics the client relies
/// on: participant checks, append-only messages with server timestamps, and
/// the one-way payment approval that appends a system message.
#[derive(Clone, Default)]
pub struct TestBackend {
    state: Arc<Mutex<BackendState>>,
}

impl TestBackend {
    pub fn new() -> Self {
        TestBackend::default()
    }

    /// An `OrderApi` handle acting as `user`, the way a signed-in device
    /// would.
    pub fn client_for(&self, user: &SessionUser) -> BackendClient {
        BackendClient {
            backend: self.clone(),
            acting: user.clone(),
        }
    }

    pub fn seed_order(&self, order: Order) {
        self.state.lock().unwrap().orders.insert(order.id, order);
    }

    pub fn order(&self, order_id: Uuid) -> Order {
        self.state.lock().unwrap().orders[&order_id].clone()
    }

    pub fn get_count(&self) -> usize {
        self.state.lock().unwrap().get_count
    }

    pub fn send_count(&self) -> usize {
        self.state.lock().unwrap().send_count
    }

    /// Fail the next `n` order fetches with a 500.
    pub fn fail_next_gets(&self, n: usize) {
        self.state.lock().unwrap().fail_gets = n;
    }

    /// Fail the next `n` message submissions with a 500.
    pub fn fail_next_sends(&self, n: usize) {
        self.state.lock().unwrap().fail_sends = n;
    }

    /// Delay the response of one upcoming fetch; the snapshot it returns is
    /// captured before the delay, like a response stuck in flight.
    pub fn delay_next_get(&self, delay: Duration) {
        self.state.lock().unwrap().get_delays.push_back(delay);
    }

    pub fn set_send_delay(&self, delay: Option<Duration>) {
        self.state.lock().unwrap().send_delay = delay;
    }

    fn apply_get(&self, order_id: Uuid) -> Result<Order, (u16, String)> {
        let mut state = self.state.lock().unwrap();
        if state.fail_gets > 0 {
            state.fail_gets -= 1;
            return Err((500, "Internal server error".to_string()));
        }
        state.get_count += 1;
        state
            .orders
            .get(&order_id)
            .cloned()
            .ok_or((404, "Order not found".to_string()))
    }

    fn apply_send(
        &self,
        acting: &SessionUser,
        order_id: Uuid,
        dto: &SendMessageDto,
    ) -> Result<Order, (u16, String)> {
        let mut state = self.state.lock().unwrap();
        if state.fail_sends > 0 {
            state.fail_sends -= 1;
            return Err((500, "Internal server error".to_string()));
        }

        let order = state
            .orders
            .get_mut(&order_id)
            .ok_or((404, "Order not found".to_string()))?;
        if !order.is_participant(acting.id) {
            return Err((403, "Not authorized to message on this order".to_string()));
        }
        if dto.is_empty() {
            return Err((400, "Message text or media is required".to_string()));
        }

        order.messages.push(Message {
            sender_id: acting.id,
            sender_name: acting.name.clone(),
            message: dto.message.trim().to_string(),
            media: dto.media_url.clone().map(|url| MessageMedia {
                url,
                media_type: dto.media_type.unwrap_or(MediaType::Image),
            }),
            is_system_message: false,
            created_at: Utc::now(),
        });
        let order = order.clone();
        state.send_count += 1;
        Ok(order)
    }

    fn apply_approve(&self, acting: &SessionUser, order_id: Uuid) -> Result<Order, (u16, String)> {
        let mut state = self.state.lock().unwrap();
        let order = state
            .orders
            .get_mut(&order_id)
            .ok_or((404, "Order not found".to_string()))?;
        if acting.id != order.freelancer.id {
            return Err((403, "Only the freelancer can confirm payment".to_string()));
        }
        if order.payment_approved {
            return Err((400, "Payment already confirmed".to_string()));
        }

        let now = Utc::now();
        order.payment_approved = true;
        order.payment_approved_at = Some(now);
        order.messages.push(Message {
            sender_id: Uuid::nil(),
            sender_name: "Frelanci".to_string(),
            message: PAYMENT_CONFIRMED_TEXT.to_string(),
            media: None,
            is_system_message: true,
            created_at: now,
        });
        Ok(order.clone())
    }

    fn apply_delete(&self, acting: &SessionUser, order_id: Uuid) -> Result<(), (u16, String)> {
        let mut state = self.state.lock().unwrap();
        let order = state
            .orders
            .get_mut(&order_id)
            .ok_or((404, "Order not found".to_string()))?;
        if order.client.id == acting.id {
            order.deleted_by_client = true;
        } else if order.freelancer.id == acting.id {
            order.deleted_by_freelancer = true;
        } else {
            return Err((403, "Not authorized to delete this order".to_string()));
        }
        Ok(())
    }

    fn apply_list(&self, acting: &SessionUser) -> Vec<Order> {
        let state = self.state.lock().unwrap();
        state
            .orders
            .values()
            .filter(|order| {
                (order.client.id == acting.id && !order.deleted_by_client)
                    || (order.freelancer.id == acting.id && !order.deleted_by_freelancer)
            })
            .cloned()
            .collect()
    }
}

/// A `TestBackend` handle bound to one acting user.
pub struct BackendClient {
    backend: TestBackend,
    acting: SessionUser,
}

fn api_err((status, message): (u16, String)) -> ApiError {
    if status == 401 {
        ApiError::Unauthorized(message)
    } else {
        ApiError::Api { status, message }
    }
}

#[async_trait]
impl OrderApi for BackendClient {
    async fn get_order(&self, order_id: Uuid) -> Result<Order, ApiError> {
        // Capture the snapshot first so a delayed response carries the data
        // it would have carried when the request was issued.
        let result = self.backend.apply_get(order_id);
        let delay = self.backend.state.lock().unwrap().get_delays.pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        result.map_err(api_err)
    }

    async fn my_orders(&self) -> Result<Vec<Order>, ApiError> {
        Ok(self.backend.apply_list(&self.acting))
    }

    async fn send_message(&self, order_id: Uuid, dto: &SendMessageDto) -> Result<Order, ApiError> {
        let delay = self.backend.state.lock().unwrap().send_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.backend
            .apply_send(&self.acting, order_id, dto)
            .map_err(api_err)
    }

    async fn approve_payment(&self, order_id: Uuid) -> Result<Order, ApiError> {
        self.backend
            .apply_approve(&self.acting, order_id)
            .map_err(api_err)
    }

    async fn delete_order(&self, order_id: Uuid) -> Result<(), ApiError> {
        self.backend
            .apply_delete(&self.acting, order_id)
            .map_err(api_err)
    }
}

pub fn client_user() -> SessionUser {
    SessionUser {
        id: Uuid::new_v4(),
        name: "Amine".to_string(),
        user_type: UserType::Client,
        email: Some("amine@example.com".to_string()),
    }
}

pub fn freelancer_user() -> SessionUser {
    SessionUser {
        id: Uuid::new_v4(),
        name: "Sara".to_string(),
        user_type: UserType::Freelancer,
        email: Some("sara@example.com".to_string()),
    }
}

pub fn seed_order(
    backend: &TestBackend,
    client: &SessionUser,
    freelancer: &SessionUser,
    price: f64,
) -> Uuid {
    let order = Order {
        id: Uuid::new_v4(),
        job: Some(JobRef {
            id: Uuid::new_v4(),
            title: "Logo design".to_string(),
        }),
        client: ParticipantRef {
            id: client.id,
            name: client.name.clone(),
            avatar_url: None,
        },
        freelancer: ParticipantRef {
            id: freelancer.id,
            name: freelancer.name.clone(),
            avatar_url: None,
        },
        price,
        requirements: None,
        status: OrderStatus::InProgress,
        payment_approved: false,
        payment_approved_at: None,
        messages: Vec::new(),
        deleted_by_client: false,
        deleted_by_freelancer: false,
        created_at: Utc::now(),
    };
    let id = order.id;
    backend.seed_order(order);
    id
}

// ---------------------------------------------------------------------------
// HTTP surface: the same backend behind the real REST routes.

#[derive(Clone)]
struct ServerState {
    backend: TestBackend,
    tokens: Arc<HashMap<String, SessionUser>>,
}

fn authenticate(state: &ServerState, headers: &HeaderMap) -> Result<SessionUser, Response> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    match token.and_then(|t| state.tokens.get(t)) {
        Some(user) => Ok(user.clone()),
        None => Err(error_response(401, "Invalid or expired token".to_string())),
    }
}

fn error_response(status: u16, message: String) -> Response {
    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(serde_json::json!({ "message": message })),
    )
        .into_response()
}

async fn get_order_handler(
    State(state): State<ServerState>,
    Path(order_id): Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = authenticate(&state, &headers) {
        return response;
    }
    match state.backend.apply_get(order_id) {
        Ok(order) => Json(order).into_response(),
        Err((status, message)) => error_response(status, message),
    }
}

async fn list_orders_handler(State(state): State<ServerState>, headers: HeaderMap) -> Response {
    match authenticate(&state, &headers) {
        Ok(user) => Json(state.backend.apply_list(&user)).into_response(),
        Err(response) => response,
    }
}

async fn send_message_handler(
    State(state): State<ServerState>,
    Path(order_id): Path<Uuid>,
    headers: HeaderMap,
    Json(dto): Json<SendMessageDto>,
) -> Response {
    let user = match authenticate(&state, &headers) {
        Ok(user) => user,
        Err(response) => return response,
    };
    match state.backend.apply_send(&user, order_id, &dto) {
        Ok(order) => Json(order).into_response(),
        Err((status, message)) => error_response(status, message),
    }
}

async fn approve_payment_handler(
    State(state): State<ServerState>,
    Path(order_id): Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    let user = match authenticate(&state, &headers) {
        Ok(user) => user,
        Err(response) => return response,
    };
    match state.backend.apply_approve(&user, order_id) {
        Ok(order) => Json(order).into_response(),
        Err((status, message)) => error_response(status, message),
    }
}

async fn delete_order_handler(
    State(state): State<ServerState>,
    Path(order_id): Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    let user = match authenticate(&state, &headers) {
        Ok(user) => user,
        Err(response) => return response,
    };
    match state.backend.apply_delete(&user, order_id) {
        Ok(()) => Json(serde_json::json!({ "message": "Order deleted from your view" }))
            .into_response(),
        Err((status, message)) => error_response(status, message),
    }
}

/// Serve `backend` on an ephemeral local port; `tokens` maps bearer tokens
/// to the users they authenticate. Returns the `/api` base URL.
pub async fn serve(backend: TestBackend, tokens: Vec<(String, SessionUser)>) -> String {
    let state = ServerState {
        backend,
        tokens: Arc::new(tokens.into_iter().collect()),
    };

    let app = Router::new()
        .route("/api/orders/my", get(list_orders_handler))
        .route(
            "/api/orders/:id",
            get(get_order_handler).delete(delete_order_handler),
        )
        .route("/api/orders/:id/message", post(send_message_handler))
        .route("/api/orders/:id/approve-payment", post(approve_payment_handler))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api", addr)
}
