use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One test observation for a driver on a branch, as served by
/// `/api/1.0/records`. Wire payloads spell the sub-test lists either as
/// `passed`/`failed` or `passed_tests`/`failed_tests`; the aliases fold both
/// spellings into one shape at the deserialization boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultRecord {
    pub driver: String,
    pub project: String,
    pub branch: String,
    pub endpoint: String,
    pub success: bool,
    #[serde(default, alias = "passed_tests")]
    pub passed: Vec<String>,
    #[serde(default, alias = "failed_tests")]
    pub failed: Vec<String>,
}

/// A driver catalog entry from `/api/1.0/drivers`. Only the identifying
/// fields are guaranteed; everything display-oriented is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverDescriptor {
    pub project_id: String,
    #[serde(default)]
    pub project_name: Option<String>,
    pub vendor: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub wiki: Option<String>,
    #[serde(default)]
    pub maintainer: Option<Maintainer>,
    #[serde(default)]
    pub releases_info: Vec<ReleaseInfo>,
    #[serde(default)]
    pub os_versions_map: IndexMap<String, BranchVerification>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Maintainer {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub irc: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseInfo {
    pub release_id: String,
    pub name: String,
    #[serde(default)]
    pub wiki: Option<String>,
}

/// Verification state of one branch in a driver's `os_versions_map`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BranchVerification {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub review_url: Option<String>,
}

/// One dropdown option as served by the `/api/1.0/list/*` endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    pub id: String,
    pub text: String,
}

/// A driver descriptor decorated for the summary table: the columns the
/// dashboard shows, with display fragments precomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverSummary {
    pub project_id: String,
    pub project_name: String,
    pub vendor: String,
    pub name: String,
    pub driver_info: String,
    pub releases_info: String,
    pub ci_tested: String,
    pub maintainer_info: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_accepts_plain_field_names() {
        let record: ResultRecord = serde_json::from_str(
            r#"{"driver": "foo", "project": "cinder", "branch": "master",
                "endpoint": "ci-1", "success": true,
                "passed": ["a"], "failed": []}"#,
        )
        .unwrap();

        assert_eq!(record.passed, vec!["a"]);
        assert!(record.failed.is_empty());
    }

    #[test]
    fn test_record_accepts_legacy_field_names() {
        let record: ResultRecord = serde_json::from_str(
            r#"{"driver": "foo", "project": "cinder", "branch": "master",
                "endpoint": "ci-1", "success": false,
                "passed_tests": [], "failed_tests": ["b", "c"]}"#,
        )
        .unwrap();

        assert!(record.passed.is_empty());
        assert_eq!(record.failed, vec!["b", "c"]);
    }

    #[test]
    fn test_record_defaults_missing_test_lists() {
        let record: ResultRecord = serde_json::from_str(
            r#"{"driver": "foo", "project": "cinder", "branch": "master",
                "endpoint": "ci-1", "success": true}"#,
        )
        .unwrap();

        assert!(record.passed.is_empty());
        assert!(record.failed.is_empty());
    }

    #[test]
    fn test_minimal_driver_descriptor_deserializes() {
        let driver: DriverDescriptor = serde_json::from_str(
            r#"{"project_id": "openstack/cinder", "vendor": "Acme", "name": "Acme ISCSI"}"#,
        )
        .unwrap();

        assert!(driver.project_name.is_none());
        assert!(driver.maintainer.is_none());
        assert!(driver.releases_info.is_empty());
        assert!(driver.os_versions_map.is_empty());
    }

    #[test]
    fn test_branch_verification_epoch_timestamp() {
        let verification: BranchVerification = serde_json::from_str(
            r#"{"comment": "Verified", "timestamp": 1400000000,
                "review_url": "https://review.example.org/123"}"#,
        )
        .unwrap();

        let timestamp = verification.timestamp.unwrap();
        assert_eq!(timestamp.timestamp(), 1_400_000_000);
    }
}
