use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{info, warn};
use serde::Serialize;
use std::path::PathBuf;

use crate::api::{DriverLogClient, ListKind};
use crate::filters::{load_filter_panel, reload_location, FilterChange, FilterSelection};
use crate::matrix::{build_matrix, RowDimension};
use crate::query::{parse_query, UrlState};
use crate::render::{dashboard_page, matrix_table, summary_table};
use crate::summary::build_summaries;

#[derive(Parser)]
#[command(name = "driverlens")]
#[command(author, version, about = "DriverLog status dashboard client", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// DriverLog service URL
    #[arg(
        short,
        long,
        global = true,
        env = "DRIVERLENS_URL",
        default_value = "http://127.0.0.1:8080"
    )]
    url: String,

    /// Output file path (defaults to stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Pretty print JSON output
    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the driver catalog and decorate it into summary rows
    Summary {
        #[command(flatten)]
        filters: FilterArgs,

        /// Emit the HTML summary table instead of JSON
        #[arg(long, default_value_t = false)]
        html: bool,
    },

    /// Fetch test results and pivot them into a row/branch matrix
    Matrix {
        #[command(flatten)]
        filters: FilterArgs,

        /// Row dimension of the pivot
        #[arg(long, value_enum, default_value_t = MatrixBy::Driver)]
        by: MatrixBy,

        /// Emit the HTML matrix table instead of JSON
        #[arg(long, default_value_t = false)]
        html: bool,
    },

    /// Fetch one filter option list
    List {
        /// Which option list to fetch
        #[arg(value_enum)]
        kind: ListArg,

        /// Substring to narrow the options
        #[arg(long)]
        query: Option<String>,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Render the full dashboard as a self-contained HTML page
    Dashboard {
        #[command(flatten)]
        filters: FilterArgs,

        /// Apply a filter change (KEY=VALUE, empty value clears) before rendering
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
    },
}

/// Filter state shared by every subcommand: a query string plus individual
/// flag overrides.
#[derive(Args)]
struct FilterArgs {
    /// Dashboard query string carrying the filter state
    #[arg(long, default_value = "")]
    state: String,

    /// Project filter, overrides the state
    #[arg(long)]
    project_id: Option<String>,

    /// Vendor filter, overrides the state
    #[arg(long)]
    vendor: Option<String>,

    /// Release filter, overrides the state
    #[arg(long)]
    release_id: Option<String>,

    /// Only results up to this moment, as seconds since the epoch
    #[arg(long)]
    date: Option<i64>,
}

impl FilterArgs {
    /// Parse `--state` and fold the individual flags in as overrides.
    fn state(&self) -> UrlState {
        let mut state = parse_query(&self.state);
        if let Some(project_id) = &self.project_id {
            state.insert("project_id".to_string(), project_id.clone());
        }
        if let Some(vendor) = &self.vendor {
            state.insert("vendor".to_string(), vendor.clone());
        }
        if let Some(release_id) = &self.release_id {
            state.insert("release_id".to_string(), release_id.clone());
        }
        if let Some(date) = self.date {
            state.insert("date".to_string(), date.to_string());
        }
        state
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum MatrixBy {
    Driver,
    Endpoint,
}

impl MatrixBy {
    fn dimension(self) -> RowDimension {
        match self {
            MatrixBy::Driver => RowDimension::Driver,
            MatrixBy::Endpoint => RowDimension::Endpoint,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ListArg {
    Projects,
    Vendors,
    Releases,
}

impl ListArg {
    fn kind(self) -> ListKind {
        match self {
            ListArg::Projects => ListKind::Projects,
            ListArg::Vendors => ListKind::Vendors,
            ListArg::Releases => ListKind::Releases,
        }
    }
}

impl Cli {
    pub async fn execute(&self) -> Result<()> {
        let client = DriverLogClient::new(&self.url)?;

        match &self.command {
            Commands::Summary { filters, html } => {
                let state = filters.state();
                let selection = FilterSelection::from_state(&state);

                let drivers = client.fetch_drivers(&selection.to_params()).await?;
                if drivers.is_empty() {
                    warn!("No drivers matched the current filters");
                }

                let summaries = build_summaries(&drivers);
                if *html {
                    self.write_output(&summary_table(&summaries))
                } else {
                    self.write_json(&summaries)
                }
            }

            Commands::Matrix { filters, by, html } => {
                let state = filters.state();
                let selection = FilterSelection::from_state(&state);

                let records = client.fetch_records(&selection.to_params()).await?;
                if records.is_empty() {
                    warn!("No test results matched the current filters");
                }

                let matrix = build_matrix(&records, by.dimension());
                if *html {
                    self.write_output(&matrix_table(&matrix, by.dimension(), &state))
                } else {
                    self.write_json(&matrix)
                }
            }

            Commands::List {
                kind,
                query,
                filters,
            } => {
                let state = filters.state();
                let selection = FilterSelection::from_state(&state);
                let kind = kind.kind();

                // A list is narrowed by the other dimensions, never by itself
                let params = selection.cross_params(kind);
                let items = client.fetch_list(kind, query.as_deref(), &params).await?;
                self.write_json(&items)
            }

            Commands::Dashboard { filters, set } => {
                let mut selection = FilterSelection::from_state(&filters.state());
                for change in set {
                    selection.apply(FilterChange::parse(change)?);
                }

                // Recompute the canonical location and re-derive the state
                // from it, the same round trip a page reload makes
                let location = reload_location(&filters.state(), &selection);
                info!("Rendering dashboard for {location}");
                let state = parse_query(&location);
                let selection = FilterSelection::from_state(&state);

                let params = selection.to_params();
                let (panel, drivers, records) = tokio::join!(
                    load_filter_panel(&client, &selection),
                    client.fetch_drivers(&params),
                    client.fetch_records(&params),
                );
                let panel = panel?;
                let drivers = drivers?;
                let records = records?;
                if drivers.is_empty() {
                    warn!("No drivers matched the current filters");
                }

                let summaries = build_summaries(&drivers);
                let driver_matrix = build_matrix(&records, RowDimension::Driver);
                let endpoint_matrix = build_matrix(&records, RowDimension::Endpoint);

                let page = dashboard_page(
                    &panel,
                    &summaries,
                    &driver_matrix,
                    &endpoint_matrix,
                    &state,
                );
                self.write_output(&page)
            }
        }
    }

    fn write_json<T: Serialize>(&self, value: &T) -> Result<()> {
        let json_output = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        self.write_output(&json_output)
    }

    fn write_output(&self, content: &str) -> Result<()> {
        if let Some(output_path) = &self.output {
            std::fs::write(output_path, content)?;
            info!("Output written to: {}", output_path.display());
        } else {
            println!("{}", content);
        }
        Ok(())
    }
}
