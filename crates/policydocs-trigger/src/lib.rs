//! policydocs-trigger — change-notification adapter for policydocs.
//!
//! Bridges inbound push deliveries to the denormalization pipeline. Each
//! delivery carries an envelope whose base64 `data` payload is a UTF-8
//! JSON `{site, env, hostname}` notification; the adapter decodes it and
//! invokes the Denormalizer exactly once.
//!
//! # Architecture
//!
//! ```text
//! POST /push
//!   │
//!   ├── decode envelope → base64 data → ChangeNotification
//!   │     └── malformed: log, acknowledge (poison messages never redeliver)
//!   ├── Denormalizer::denormalize(site, env, hostname)
//!   │     ├── terminal failure: log with context, acknowledge
//!   │     └── retryable failure: log, request redelivery
//!   ▼
//! 204 No Content (ack) | 503 Service Unavailable (redeliver)
//! ```
//!
//! Redelivery is the delivery framework's decision, driven entirely by the
//! response status; the adapter never retries internally.

pub mod envelope;
pub mod handler;
pub mod push;

pub use envelope::{decode_notification, EnvelopeError, PushEnvelope, PushMessage};
pub use handler::{Disposition, UpdateHandler};
pub use push::build_router;
