//! Push envelope decoding.
//!
//! A delivery body is an outer JSON envelope whose `message.data` field is
//! base64; the decoded bytes are UTF-8 JSON with the `{site, env, hostname}`
//! notification. Every failure along that chain is a malformed message —
//! the ack policy treats all [`EnvelopeError`] variants identically.

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Deserialize;
use thiserror::Error;

use policydocs_core::types::ChangeNotification;

/// Outer push-delivery envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct PushEnvelope {
    pub message: PushMessage,
    #[serde(default)]
    pub subscription: Option<String>,
}

/// The delivered message: base64 payload plus delivery metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushMessage {
    /// Base64-encoded notification payload.
    pub data: String,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub publish_time: Option<String>,
}

/// Decode failures. All variants mean "malformed message".
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("undecodable push envelope: {0}")]
    Envelope(String),

    #[error("message data is not valid base64: {0}")]
    Data(String),

    #[error("notification payload is not valid JSON: {0}")]
    Payload(String),
}

/// Decode a push-delivery body into a change notification.
pub fn decode_notification(body: &[u8]) -> Result<ChangeNotification, EnvelopeError> {
    let envelope: PushEnvelope =
        serde_json::from_slice(body).map_err(|e| EnvelopeError::Envelope(e.to_string()))?;
    let payload = STANDARD
        .decode(envelope.message.data.as_bytes())
        .map_err(|e| EnvelopeError::Data(e.to_string()))?;
    serde_json::from_slice(&payload).map_err(|e| EnvelopeError::Payload(e.to_string()))
}
