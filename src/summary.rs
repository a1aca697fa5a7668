use crate::models::{DriverDescriptor, DriverSummary, Maintainer};
use crate::render::html_escape;

/// Decorate driver descriptors into display-ready summary rows.
///
/// Decoration is total: any descriptor, however sparse, yields a row. Every
/// missing optional field falls back to a neutral display value.
pub fn build_summaries(drivers: &[DriverDescriptor]) -> Vec<DriverSummary> {
    drivers.iter().map(decorate_driver).collect()
}

fn decorate_driver(driver: &DriverDescriptor) -> DriverSummary {
    DriverSummary {
        project_id: driver.project_id.clone(),
        project_name: driver
            .project_name
            .clone()
            .unwrap_or_else(|| driver.project_id.clone()),
        vendor: driver.vendor.clone(),
        name: driver.name.clone(),
        driver_info: driver_info(driver),
        releases_info: releases_info(driver),
        ci_tested: ci_badge(driver),
        maintainer_info: maintainer_info(driver.maintainer.as_ref()),
    }
}

/// Driver name linked to its wiki page when one is recorded, with the
/// description on a line below when present.
fn driver_info(driver: &DriverDescriptor) -> String {
    let name = html_escape(&driver.name);
    let mut info = match &driver.wiki {
        Some(wiki) => format!("<a href=\"{}\">{name}</a>", html_escape(wiki)),
        None => name,
    };
    if let Some(description) = &driver.description {
        info.push_str(&format!("<div>{}</div>", html_escape(description)));
    }
    info
}

fn releases_info(driver: &DriverDescriptor) -> String {
    driver
        .releases_info
        .iter()
        .map(|release| match &release.wiki {
            Some(wiki) => format!(
                "<a href=\"{}\">{}</a>",
                html_escape(wiki),
                html_escape(&release.name)
            ),
            None => html_escape(&release.name),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Three-way CI badge from the master branch verification: green check linked
/// to the review when one is recorded, grey check for an unreviewed entry,
/// red cross when master was never verified.
fn ci_badge(driver: &DriverDescriptor) -> String {
    match driver.os_versions_map.get("master") {
        Some(master) => match &master.review_url {
            Some(url) => format!(
                "<a href=\"{}\"><span style='color: green;'>&#x2714;</span></a>",
                html_escape(url)
            ),
            None => "<span style='color: grey;'>&#x2714;</span>".to_string(),
        },
        None => "<span style='color: red;'>&#x2718;</span>".to_string(),
    }
}

/// Contact line: mailto link, then IRC link, then plain name, then nothing.
/// Link text is the maintainer's name, falling back to the handle itself.
fn maintainer_info(maintainer: Option<&Maintainer>) -> String {
    let Some(maintainer) = maintainer else {
        return String::new();
    };
    if let Some(email) = &maintainer.email {
        let text = maintainer.name.as_deref().unwrap_or(email);
        return format!(
            "<a href=\"mailto:{}\">{}</a>",
            html_escape(email),
            html_escape(text)
        );
    }
    if let Some(irc) = &maintainer.irc {
        let text = maintainer.name.as_deref().unwrap_or(irc);
        return format!(
            "<a href=\"irc://{}\">{}</a>",
            html_escape(irc),
            html_escape(text)
        );
    }
    maintainer.name.as_deref().map_or_else(String::new, html_escape)
}
