//! Push-delivery HTTP surface.
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | POST | `/push` | Receive one push delivery |
//! | GET | `/healthz` | Liveness probe |
//!
//! The delivery framework treats any 2xx as acknowledge, so `/push`
//! answers 204 No Content for [`Disposition::Ack`] and 503 Service
//! Unavailable for [`Disposition::Redeliver`].

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;

use policydocs_store::PolicyDocStore;

use crate::handler::{Disposition, UpdateHandler};

/// Shared state for the push routes.
pub struct PushState<S: PolicyDocStore> {
    handler: Arc<UpdateHandler<S>>,
}

impl<S: PolicyDocStore> Clone for PushState<S> {
    fn clone(&self) -> Self {
        Self {
            handler: self.handler.clone(),
        }
    }
}

/// Build the push-delivery router.
pub fn build_router<S: PolicyDocStore + 'static>(handler: UpdateHandler<S>) -> Router {
    let state = PushState {
        handler: Arc::new(handler),
    };
    Router::new()
        .route("/push", post(receive_push::<S>))
        .route("/healthz", get(healthz))
        .with_state(state)
}

/// POST /push
async fn receive_push<S: PolicyDocStore + 'static>(
    State(state): State<PushState<S>>,
    body: Bytes,
) -> StatusCode {
    match state.handler.handle(&body) {
        Disposition::Ack => StatusCode::NO_CONTENT,
        Disposition::Redeliver => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// GET /healthz
async fn healthz() -> StatusCode {
    StatusCode::OK
}
