use log::warn;

use crate::api::{DriverLogClient, ListKind};
use crate::error::{DriverLensError, Result};
use crate::models::ListItem;
use crate::query::{make_uri, UrlState};

/// Explicit filter state of one dashboard view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub project_id: Option<String>,
    pub vendor: Option<String>,
    pub release_id: Option<String>,
    pub date: Option<i64>,
}

/// One selection change, parsed from a `key=value` argument. An empty value
/// clears the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChange {
    Project(Option<String>),
    Vendor(Option<String>),
    Release(Option<String>),
    Date(Option<i64>),
}

/// One filter dimension ready for display: its option list, narrowed by the
/// other current selections, and the resolved current selection.
#[derive(Debug, Clone)]
pub struct FilterOptions {
    pub kind: ListKind,
    pub options: Vec<ListItem>,
    pub selected: Option<ListItem>,
}

impl FilterSelection {
    /// Derive the selection from URL state. `level_id` is recognized as a
    /// legacy spelling of `release_id`; empty values count as unset and a
    /// non-numeric `date` is dropped.
    pub fn from_state(state: &UrlState) -> Self {
        let release_id =
            non_empty(state.get("release_id")).or_else(|| non_empty(state.get("level_id")));
        let date = non_empty(state.get("date")).and_then(|raw| raw.parse::<i64>().ok());

        Self {
            project_id: non_empty(state.get("project_id")),
            vendor: non_empty(state.get("vendor")),
            release_id,
            date,
        }
    }

    /// Request parameters for the current selection, values lower-cased,
    /// unset fields omitted.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(project_id) = &self.project_id {
            params.push(("project_id".to_string(), project_id.to_lowercase()));
        }
        if let Some(vendor) = &self.vendor {
            params.push(("vendor".to_string(), vendor.to_lowercase()));
        }
        if let Some(release_id) = &self.release_id {
            params.push(("release_id".to_string(), release_id.to_lowercase()));
        }
        if let Some(date) = self.date {
            params.push(("date".to_string(), date.to_string()));
        }
        params
    }

    /// The same parameters as URL options.
    pub fn to_options(&self) -> UrlState {
        self.to_params().into_iter().collect()
    }

    /// Request parameters narrowing the `kind` option list: the selections
    /// of the other two list dimensions. The list endpoints ignore every
    /// other parameter, `date` included.
    pub fn cross_params(&self, kind: ListKind) -> Vec<(String, String)> {
        ListKind::ALL
            .into_iter()
            .filter(|other| *other != kind)
            .filter_map(|other| {
                self.value_of(other)
                    .map(|value| (other.param().to_string(), value.to_lowercase()))
            })
            .collect()
    }

    pub fn value_of(&self, kind: ListKind) -> Option<String> {
        match kind {
            ListKind::Projects => self.project_id.clone(),
            ListKind::Vendors => self.vendor.clone(),
            ListKind::Releases => self.release_id.clone(),
        }
    }

    pub fn apply(&mut self, change: FilterChange) {
        match change {
            FilterChange::Project(value) => self.project_id = value,
            FilterChange::Vendor(value) => self.vendor = value,
            FilterChange::Release(value) => self.release_id = value,
            FilterChange::Date(value) => self.date = value,
        }
    }
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|value| !value.is_empty()).cloned()
}

impl FilterChange {
    /// The change that sets (or, with `None`, clears) one list dimension.
    pub fn select(kind: ListKind, value: Option<String>) -> Self {
        match kind {
            ListKind::Projects => FilterChange::Project(value),
            ListKind::Vendors => FilterChange::Vendor(value),
            ListKind::Releases => FilterChange::Release(value),
        }
    }

    pub fn parse(input: &str) -> Result<Self> {
        let (key, value) = input.split_once('=').ok_or_else(|| {
            DriverLensError::ConfigError(format!("Expected KEY=VALUE, got '{input}'"))
        })?;
        let value = (!value.is_empty()).then(|| value.to_string());

        match key {
            "project_id" => Ok(FilterChange::Project(value)),
            "vendor" => Ok(FilterChange::Vendor(value)),
            "release_id" | "level_id" => Ok(FilterChange::Release(value)),
            "date" => {
                let date = match value {
                    Some(raw) => Some(raw.parse::<i64>().map_err(|_| {
                        DriverLensError::ConfigError(format!("Invalid date value: {raw}"))
                    })?),
                    None => None,
                };
                Ok(FilterChange::Date(date))
            }
            _ => Err(DriverLensError::ConfigError(format!(
                "Unknown filter parameter: {key}"
            ))),
        }
    }
}

/// Recompute the canonical dashboard location for a selection: set fields
/// overwrite their parameter and unset fields remove it; the legacy
/// `level_id` spelling is dropped. Unrelated parameters pass through.
pub fn reload_location(state: &UrlState, selection: &FilterSelection) -> String {
    let mut merged = state.clone();
    merged.shift_remove("level_id");

    let options = selection.to_options();
    for param in ["project_id", "vendor", "release_id", "date"] {
        match options.get(param) {
            Some(value) => {
                merged.insert(param.to_string(), value.clone());
            }
            None => {
                merged.shift_remove(param);
            }
        }
    }

    make_uri("/", &merged, None)
}

/// Load the three filter dimensions concurrently, each narrowed by the other
/// two current selections, resolving every set selection to a display item.
pub async fn load_filter_panel(
    client: &DriverLogClient,
    selection: &FilterSelection,
) -> Result<Vec<FilterOptions>> {
    let loads = ListKind::ALL
        .iter()
        .map(|kind| load_filter(client, *kind, selection));

    futures::future::join_all(loads).await.into_iter().collect()
}

async fn load_filter(
    client: &DriverLogClient,
    kind: ListKind,
    selection: &FilterSelection,
) -> Result<FilterOptions> {
    let params = selection.cross_params(kind);

    let selected_id = selection.value_of(kind);
    let lookup = async {
        match &selected_id {
            Some(id) => client.lookup_item(kind, id).await,
            None => Ok(None),
        }
    };

    let (options, selected) = tokio::join!(client.fetch_list(kind, None, &params), lookup);
    let options = options?;
    let selected = selected?;

    if let (Some(id), None) = (&selected_id, &selected) {
        warn!("Unknown {} selection: {id}", kind.param());
    }

    Ok(FilterOptions {
        kind,
        options,
        selected,
    })
}
