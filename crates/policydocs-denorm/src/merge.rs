//! Pure merge of metadata and edge logic into the denormalized record.

use policydocs_core::types::{Denormalized, EdgeLogic, HostnameMetadata};

/// Flatten a metadata record and an edge-logic record into one
/// [`Denormalized`] document.
///
/// Deterministic for fixed inputs: identity fields come from metadata,
/// routing fields from edge logic, `created` from metadata, `updated` is
/// the later of the two records' `updated` stamps. The edge-logic
/// `cache_control` field is intentionally not projected.
pub fn merge(metadata: &HostnameMetadata, edge_logic: &EdgeLogic) -> Denormalized {
    Denormalized {
        hostname: metadata.hostname.clone(),
        zone: metadata.zone.clone(),
        redirect_to: edge_logic.redirect_to.clone(),
        enforce_https: edge_logic.enforce_https.clone(),
        backend: edge_logic.backend.clone(),
        build_id: edge_logic.build_id.clone(),
        jurisdiction: edge_logic.jurisdiction.clone(),
        site_id: metadata.site_id.clone(),
        site_env: metadata.site_env.clone(),
        created: metadata.created,
        updated: metadata.updated.max(edge_logic.updated),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn ts(secs: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, secs).unwrap()
    }

    fn metadata() -> HostnameMetadata {
        HostnameMetadata {
            hostname: "a.com".to_string(),
            zone: "z1".to_string(),
            created: ts(0),
            updated: ts(10),
            site_id: "s1".to_string(),
            site_env: "dev".to_string(),
        }
    }

    fn edge_logic() -> EdgeLogic {
        EdgeLogic {
            redirect_to: "b.com".to_string(),
            enforce_https: "true".to_string(),
            cache_control: "no-store".to_string(),
            created: ts(5),
            updated: ts(20),
            backend: "be1".to_string(),
            build_id: "123".to_string(),
            jurisdiction: "US".to_string(),
        }
    }

    #[test]
    fn merge_is_deterministic_for_fixed_inputs() {
        let expected = Denormalized {
            hostname: "a.com".to_string(),
            zone: "z1".to_string(),
            redirect_to: "b.com".to_string(),
            enforce_https: "true".to_string(),
            backend: "be1".to_string(),
            build_id: "123".to_string(),
            jurisdiction: "US".to_string(),
            site_id: "s1".to_string(),
            site_env: "dev".to_string(),
            created: ts(0),
            updated: ts(20),
        };

        assert_eq!(merge(&metadata(), &edge_logic()), expected);
        assert_eq!(merge(&metadata(), &edge_logic()), expected);
    }

    #[test]
    fn updated_takes_the_later_stamp() {
        let mut md = metadata();
        md.updated = ts(50);
        let merged = merge(&md, &edge_logic());
        assert_eq!(merged.updated, ts(50));

        md.updated = ts(10);
        let merged = merge(&md, &edge_logic());
        assert_eq!(merged.updated, ts(20));
    }

    #[test]
    fn cache_control_is_not_projected() {
        let merged = merge(&metadata(), &edge_logic());
        let value = serde_json::to_value(&merged).unwrap();
        assert!(value.get("cache_control").is_none());
    }
}
