//! Notification handler and ack policy.
//!
//! `UpdateHandler` is the adapter's state machine for one delivery:
//! `Received → Decoded → (Denormalizing → Done) | Rejected(malformed)`.
//! The resulting [`Disposition`] is what the delivery framework sees:
//!
//! - malformed message: acknowledged without invoking the pipeline, so a
//!   poison message cannot redeliver forever;
//! - terminal pipeline failure (missing record, malformed document, bad
//!   derived path): logged with full context and acknowledged — redelivery
//!   cannot fix a data problem;
//! - retryable pipeline failure (transient store error, write failure):
//!   redelivery requested. The framework's redelivery is the only retry
//!   mechanism in the system.

use tracing::{error, info, warn};

use policydocs_denorm::Denormalizer;
use policydocs_store::PolicyDocStore;

use crate::envelope::decode_notification;

/// What to tell the delivery framework about one delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Acknowledge: the message is consumed and must not redeliver.
    Ack,
    /// Request redelivery: the failure was transient.
    Redeliver,
}

/// Decodes deliveries and invokes the Denormalizer exactly once each.
pub struct UpdateHandler<S: PolicyDocStore> {
    denormalizer: Denormalizer<S>,
}

impl<S: PolicyDocStore> UpdateHandler<S> {
    pub fn new(store: S) -> Self {
        Self {
            denormalizer: Denormalizer::new(store),
        }
    }

    /// Handle one delivery body and classify the outcome.
    pub fn handle(&self, body: &[u8]) -> Disposition {
        let notification = match decode_notification(body) {
            Ok(notification) => notification,
            Err(e) => {
                warn!(
                    error = %e,
                    payload = %String::from_utf8_lossy(body),
                    "malformed change notification acknowledged"
                );
                return Disposition::Ack;
            }
        };

        match self.denormalizer.denormalize(
            &notification.site,
            &notification.env,
            &notification.hostname,
        ) {
            Ok(doc) => {
                info!(hostname = %doc.hostname, "change notification processed");
                Disposition::Ack
            }
            Err(e) if e.is_retryable() => {
                error!(
                    error = %e,
                    hostname = %notification.hostname,
                    payload = %String::from_utf8_lossy(body),
                    "denormalization failed, requesting redelivery"
                );
                Disposition::Redeliver
            }
            Err(e) => {
                error!(
                    error = %e,
                    hostname = %notification.hostname,
                    payload = %String::from_utf8_lossy(body),
                    "denormalization failed terminally, acknowledging"
                );
                Disposition::Ack
            }
        }
    }
}
