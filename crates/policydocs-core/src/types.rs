//! Document types for per-hostname policy configuration.
//!
//! The three normalized records share a `(site_id, env, hostname)` key and
//! are stored as JSON documents. Field names match the wire format of the
//! authoring system, so none of these types carry serde renames. Missing
//! fields in a stored document are a deserialization error by design: a
//! short record signals upstream data corruption, not a default.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Hostname existence/verification marker.
///
/// Fetched as part of the consistent snapshot; its `verified` flag is not
/// projected into the denormalized output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Hostname {
    pub verified: bool,
}

/// Identity and placement metadata for a hostname.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HostnameMetadata {
    pub hostname: String,
    pub zone: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub site_id: String,
    pub site_env: String,
}

/// Routing and policy rules for a hostname.
///
/// `cache_control` is carried on the normalized record but not projected
/// into the denormalized output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EdgeLogic {
    pub redirect_to: String,
    pub enforce_https: String,
    pub cache_control: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub backend: String,
    pub build_id: String,
    pub jurisdiction: String,
}

/// The flattened, read-optimized merge of metadata and edge logic for one
/// hostname. Fully overwritten on every run — never patched in place.
///
/// `created` comes from the metadata record; `updated` is the later of the
/// two input records' `updated` stamps, so the document stays a pure
/// function of its inputs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Denormalized {
    pub hostname: String,
    pub zone: String,
    pub redirect_to: String,
    pub enforce_https: String,
    pub backend: String,
    pub build_id: String,
    pub jurisdiction: String,
    pub site_id: String,
    pub site_env: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

/// One consistent snapshot of the three normalized records for a key.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedDocs {
    pub hostname: Hostname,
    pub metadata: HostnameMetadata,
    pub edge_logic: EdgeLogic,
}

/// Decoded payload of a policy-document change notification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChangeNotification {
    pub site: String,
    pub env: String,
    pub hostname: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(secs: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, secs).unwrap()
    }

    #[test]
    fn edge_logic_wire_names() {
        let el = EdgeLogic {
            redirect_to: "b.com".to_string(),
            enforce_https: "true".to_string(),
            cache_control: "no-store".to_string(),
            created: ts(0),
            updated: ts(1),
            backend: "be1".to_string(),
            build_id: "123".to_string(),
            jurisdiction: "US".to_string(),
        };

        let value = serde_json::to_value(&el).unwrap();
        for field in [
            "redirect_to",
            "enforce_https",
            "cache_control",
            "created",
            "updated",
            "backend",
            "build_id",
            "jurisdiction",
        ] {
            assert!(value.get(field).is_some(), "missing wire field {field}");
        }
    }

    #[test]
    fn metadata_wire_names() {
        let hm = HostnameMetadata {
            hostname: "a.com".to_string(),
            zone: "z1".to_string(),
            created: ts(0),
            updated: ts(1),
            site_id: "s1".to_string(),
            site_env: "dev".to_string(),
        };

        let value = serde_json::to_value(&hm).unwrap();
        for field in ["hostname", "zone", "created", "updated", "site_id", "site_env"] {
            assert!(value.get(field).is_some(), "missing wire field {field}");
        }
    }

    #[test]
    fn metadata_rejects_missing_fields() {
        // A record with fields missing is a data-quality problem, not a
        // document with defaults.
        let short = r#"{"hostname":"a.com","zone":"z1"}"#;
        assert!(serde_json::from_str::<HostnameMetadata>(short).is_err());
    }

    #[test]
    fn change_notification_payload_shape() {
        let n: ChangeNotification =
            serde_json::from_str(r#"{"site":"s1","env":"dev","hostname":"a.com"}"#).unwrap();
        assert_eq!(n.site, "s1");
        assert_eq!(n.env, "dev");
        assert_eq!(n.hostname, "a.com");
    }

    #[test]
    fn timestamps_round_trip() {
        let hostname = Hostname { verified: true };
        let json = serde_json::to_vec(&hostname).unwrap();
        let back: Hostname = serde_json::from_slice(&json).unwrap();
        assert_eq!(back, hostname);

        let hm = HostnameMetadata {
            hostname: "a.com".to_string(),
            zone: "z1".to_string(),
            created: ts(0),
            updated: ts(30),
            site_id: "s1".to_string(),
            site_env: "dev".to_string(),
        };
        let json = serde_json::to_vec(&hm).unwrap();
        let back: HostnameMetadata = serde_json::from_slice(&json).unwrap();
        assert_eq!(back, hm);
    }
}
