use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::models::ResultRecord;

/// Which record field keys the matrix rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowDimension {
    Driver,
    Endpoint,
}

/// Aggregated outcome of one row on one branch.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CellOutcome {
    pub success: bool,
    pub passed: Vec<String>,
    pub failed: Vec<String>,
}

/// Row-by-branch pivot of a set of test result records. Rows and branches
/// keep the order records first mention them in.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct TestMatrix {
    pub rows: Vec<String>,
    pub branches: Vec<String>,
    pub cells: IndexMap<String, IndexMap<String, CellOutcome>>,
}

impl TestMatrix {
    pub fn get(&self, row: &str, branch: &str) -> Option<&CellOutcome> {
        self.cells.get(row).and_then(|cells| cells.get(branch))
    }
}

/// Pivot `records` into a [`TestMatrix`] along `dimension`.
///
/// A cell starts with the success flag of its first record and any later
/// failing record clears it for good. A driver-keyed cell accumulates the
/// endpoint names split by each record's flag; an endpoint-keyed cell
/// accumulates the test names each record reports itself.
pub fn build_matrix(records: &[ResultRecord], dimension: RowDimension) -> TestMatrix {
    let mut cells: IndexMap<String, IndexMap<String, CellOutcome>> = IndexMap::new();
    let mut branches: IndexSet<String> = IndexSet::new();

    for record in records {
        let row = match dimension {
            RowDimension::Driver => &record.driver,
            RowDimension::Endpoint => &record.endpoint,
        };
        branches.insert(record.branch.clone());

        let cell = cells
            .entry(row.clone())
            .or_default()
            .entry(record.branch.clone())
            .or_insert_with(|| CellOutcome {
                success: record.success,
                passed: Vec::new(),
                failed: Vec::new(),
            });
        if !record.success {
            cell.success = false;
        }
        match dimension {
            RowDimension::Driver => {
                if record.success {
                    cell.passed.push(record.endpoint.clone());
                } else {
                    cell.failed.push(record.endpoint.clone());
                }
            }
            RowDimension::Endpoint => {
                cell.passed.extend(record.passed.iter().cloned());
                cell.failed.extend(record.failed.iter().cloned());
            }
        }
    }

    TestMatrix {
        rows: cells.keys().cloned().collect(),
        branches: branches.into_iter().collect(),
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(driver: &str, branch: &str, endpoint: &str, success: bool) -> ResultRecord {
        ResultRecord {
            driver: driver.to_string(),
            project: "cinder".to_string(),
            branch: branch.to_string(),
            endpoint: endpoint.to_string(),
            success,
            passed: Vec::new(),
            failed: Vec::new(),
        }
    }

    #[test]
    fn test_driver_matrix_accumulates_endpoints_by_flag() {
        let records = vec![
            record("Acme ISCSI", "master", "cinder-ci", true),
            record("Acme ISCSI", "master", "acme-lab", false),
        ];
        let matrix = build_matrix(&records, RowDimension::Driver);

        assert_eq!(matrix.rows, vec!["Acme ISCSI"]);
        assert_eq!(matrix.branches, vec!["master"]);
        let cell = matrix.get("Acme ISCSI", "master").unwrap();
        assert!(!cell.success);
        assert_eq!(cell.passed, vec!["cinder-ci"]);
        assert_eq!(cell.failed, vec!["acme-lab"]);
    }

    #[test]
    fn test_failure_poisons_cell_permanently() {
        let records = vec![
            record("Acme ISCSI", "master", "acme-lab", false),
            record("Acme ISCSI", "master", "cinder-ci", true),
        ];
        let matrix = build_matrix(&records, RowDimension::Driver);

        let cell = matrix.get("Acme ISCSI", "master").unwrap();
        assert!(!cell.success);
        assert_eq!(cell.passed, vec!["cinder-ci"]);
        assert_eq!(cell.failed, vec!["acme-lab"]);
    }

    #[test]
    fn test_rows_and_branches_keep_first_appearance_order() {
        let records = vec![
            record("Zeta FC", "stable/ocata", "zeta-ci", true),
            record("Acme ISCSI", "master", "acme-lab", true),
            record("Zeta FC", "master", "zeta-ci", true),
        ];
        let matrix = build_matrix(&records, RowDimension::Driver);

        assert_eq!(matrix.rows, vec!["Zeta FC", "Acme ISCSI"]);
        assert_eq!(matrix.branches, vec!["stable/ocata", "master"]);
    }

    #[test]
    fn test_endpoint_matrix_carries_reported_test_names() {
        let mut passing = record("Acme ISCSI", "master", "acme-lab", true);
        passing.passed = vec!["test_attach".to_string(), "test_detach".to_string()];
        let mut failing = record("Zeta FC", "master", "acme-lab", false);
        failing.failed = vec!["test_snapshot".to_string()];

        let matrix = build_matrix(&[passing, failing], RowDimension::Endpoint);

        assert_eq!(matrix.rows, vec!["acme-lab"]);
        let cell = matrix.get("acme-lab", "master").unwrap();
        assert!(!cell.success);
        assert_eq!(cell.passed, vec!["test_attach", "test_detach"]);
        assert_eq!(cell.failed, vec!["test_snapshot"]);
    }

    #[test]
    fn test_endpoint_success_record_contributes_failed_names() {
        let mut mixed = record("Acme ISCSI", "master", "acme-lab", true);
        mixed.passed = vec!["test_attach".to_string()];
        mixed.failed = vec!["test_flaky".to_string()];

        let matrix = build_matrix(&[mixed], RowDimension::Endpoint);

        let cell = matrix.get("acme-lab", "master").unwrap();
        assert!(cell.success);
        assert_eq!(cell.passed, vec!["test_attach"]);
        assert_eq!(cell.failed, vec!["test_flaky"]);
    }

    #[test]
    fn test_empty_records_build_empty_matrix() {
        let matrix = build_matrix(&[], RowDimension::Driver);
        assert!(matrix.rows.is_empty());
        assert!(matrix.branches.is_empty());
        assert!(matrix.cells.is_empty());
    }

    #[test]
    fn test_cells_missing_for_untested_combinations() {
        let records = vec![
            record("Acme ISCSI", "master", "acme-lab", true),
            record("Zeta FC", "stable/ocata", "zeta-ci", true),
        ];
        let matrix = build_matrix(&records, RowDimension::Driver);

        assert!(matrix.get("Acme ISCSI", "stable/ocata").is_none());
        assert!(matrix.get("Zeta FC", "master").is_none());
    }
}
