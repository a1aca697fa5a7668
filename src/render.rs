use chrono::Utc;

use crate::filters::{reload_location, FilterChange, FilterOptions, FilterSelection};
use crate::matrix::{CellOutcome, RowDimension, TestMatrix};
use crate::models::DriverSummary;
use crate::query::{make_uri, UrlState};

pub fn html_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Render one matrix cell: a colored glyph wrapped in a tooltip span listing
/// the passed and failed test names. An absent cell renders a neutral marker
/// with an empty tooltip.
pub fn format_test_result(outcome: Option<&CellOutcome>) -> String {
    let mut tooltip = String::new();
    let glyph = match outcome {
        None => "<span style='color: grey;'>n/a</span>",
        Some(outcome) => {
            let mut parts = Vec::new();
            if !outcome.passed.is_empty() {
                parts.push(format!("Passed: {}", outcome.passed.join(", ")));
            }
            if !outcome.failed.is_empty() {
                parts.push(format!("Failed: {}", outcome.failed.join(", ")));
            }
            tooltip = parts.join(" ");

            if outcome.success {
                "<span style='color: green;'>&#x2714;</span>"
            } else {
                "<span style='color: red;'>&#x2718;</span>"
            }
        }
    };

    format!("<span title='{}'>{glyph}</span>", html_escape(&tooltip))
}

/// Link `title` to the current location with one parameter overridden.
/// The value is lower-cased and percent-encoded at serialization.
pub fn make_link(id: &str, title: &str, param_name: &str, state: &UrlState) -> String {
    let mut options = UrlState::new();
    options.insert(param_name.to_string(), id.to_string());
    let link = make_uri("/", state, Some(&options));
    format!("<a href=\"{}\">{}</a>", html_escape(&link), html_escape(title))
}

/// Render a pivoted matrix as an HTML table. Driver rows link back to the
/// dashboard narrowed to that driver; endpoint rows are plain labels.
pub fn matrix_table(matrix: &TestMatrix, dimension: RowDimension, state: &UrlState) -> String {
    let key_title = match dimension {
        RowDimension::Driver => "Driver",
        RowDimension::Endpoint => "Endpoint",
    };

    let mut html = String::new();
    html.push_str("<table class=\"matrix\">\n<thead><tr>");
    html.push_str(&format!("<th>{key_title}</th>"));
    for branch in &matrix.branches {
        html.push_str(&format!("<th>{}</th>", html_escape(branch)));
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    for row in &matrix.rows {
        let label = match dimension {
            RowDimension::Driver => make_link(row, row, "driver", state),
            RowDimension::Endpoint => html_escape(row),
        };
        html.push_str(&format!("<tr><td>{label}</td>"));
        for branch in &matrix.branches {
            html.push_str(&format!(
                "<td>{}</td>",
                format_test_result(matrix.get(row, branch))
            ));
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</tbody>\n</table>\n");
    html
}

/// Render decorated driver summaries as an HTML table. The decorated fields
/// are already display fragments and go in as-is.
pub fn summary_table(summaries: &[DriverSummary]) -> String {
    let mut html = String::new();
    html.push_str(
        "<table class=\"summary\">\n<thead><tr><th>Project</th><th>Vendor</th>\
         <th>Driver</th><th>Releases</th><th>CI tested</th><th>Maintainer</th>\
         </tr></thead>\n<tbody>\n",
    );

    for summary in summaries {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            html_escape(&summary.project_name),
            html_escape(&summary.vendor),
            summary.driver_info,
            summary.releases_info,
            summary.ci_tested,
            summary.maintainer_info,
        ));
    }

    html.push_str("</tbody>\n</table>\n");
    html
}

/// Render the three filter dropdowns. Every option's value is the recomputed
/// dashboard location for that selection, so choosing one navigates straight
/// to the reloaded view.
pub fn filter_panel(panel: &[FilterOptions], state: &UrlState) -> String {
    let selection = FilterSelection::from_state(state);

    let mut html = String::new();
    html.push_str("<div class=\"filters\">\n");
    for filter in panel {
        let param = filter.kind.param();
        html.push_str(&format!(
            "<label for=\"{param}_selector\">{}</label>\n",
            filter.kind.label()
        ));
        html.push_str(&format!(
            "<select id=\"{param}_selector\" onchange=\"window.location = this.value;\">\n"
        ));

        let mut cleared = selection.clone();
        cleared.apply(FilterChange::select(filter.kind, None));
        html.push_str(&format!(
            "<option value=\"{}\">All</option>\n",
            html_escape(&reload_location(state, &cleared))
        ));

        for item in &filter.options {
            let mut changed = selection.clone();
            changed.apply(FilterChange::select(filter.kind, Some(item.id.clone())));
            let marker = if filter.selected.as_ref().is_some_and(|sel| sel.id == item.id) {
                " selected"
            } else {
                ""
            };
            html.push_str(&format!(
                "<option value=\"{}\"{marker}>{}</option>\n",
                html_escape(&reload_location(state, &changed)),
                html_escape(&item.text)
            ));
        }

        html.push_str("</select>\n");
    }
    html.push_str("</div>\n");
    html
}

/// Assemble the self-contained dashboard page: filter panel, driver summary
/// table and both result matrices.
pub fn dashboard_page(
    panel: &[FilterOptions],
    summaries: &[DriverSummary],
    driver_matrix: &TestMatrix,
    endpoint_matrix: &TestMatrix,
    state: &UrlState,
) -> String {
    let mut html = String::new();
    html.push_str(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Driver CI status</title>\n<style>\n\
         body { font-family: sans-serif; margin: 24px; }\n\
         h1 { font-size: 22px; }\n\
         h2 { font-size: 17px; margin-top: 28px; }\n\
         table { border-collapse: collapse; margin: 12px 0; }\n\
         th, td { border: 1px solid #ccc; padding: 6px 10px; text-align: left; }\n\
         th { background: #f0f0f0; }\n\
         .filters label { margin-right: 4px; }\n\
         .filters select { margin-right: 16px; }\n\
         .footer { margin-top: 24px; color: #777; font-size: 12px; }\n\
         </style>\n</head>\n<body>\n",
    );
    html.push_str("<h1>Driver CI status</h1>\n");
    html.push_str(&filter_panel(panel, state));

    html.push_str("<h2>Driver summary</h2>\n");
    html.push_str(&summary_table(summaries));

    html.push_str("<h2>Results by driver</h2>\n");
    html.push_str(&matrix_table(driver_matrix, RowDimension::Driver, state));

    html.push_str("<h2>Results by endpoint</h2>\n");
    html.push_str(&matrix_table(endpoint_matrix, RowDimension::Endpoint, state));

    html.push_str(&format!(
        "<div class=\"footer\">Generated at {}</div>\n</body>\n</html>\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html
}
