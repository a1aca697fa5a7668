use log::info;
use reqwest::StatusCode;
use serde_json::Value;

use super::client::DriverLogClient;
use crate::error::{DriverLensError, Result};
use crate::models::ListItem;

/// The three filter dimensions served by the list endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListKind {
    Projects,
    Vendors,
    Releases,
}

impl ListKind {
    pub const ALL: [ListKind; 3] = [ListKind::Projects, ListKind::Vendors, ListKind::Releases];

    /// Path segment of the list endpoint, also the key of its envelope.
    pub fn path(self) -> &'static str {
        match self {
            ListKind::Projects => "project_ids",
            ListKind::Vendors => "vendors",
            ListKind::Releases => "releases",
        }
    }

    /// Request parameter carrying a selection of this kind.
    pub fn param(self) -> &'static str {
        match self {
            ListKind::Projects => "project_id",
            ListKind::Vendors => "vendor",
            ListKind::Releases => "release_id",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ListKind::Projects => "Project",
            ListKind::Vendors => "Vendor",
            ListKind::Releases => "Release",
        }
    }

    // Key of the single-item lookup envelope.
    fn item_key(self) -> &'static str {
        match self {
            ListKind::Projects => "project_id",
            ListKind::Vendors => "vendor",
            ListKind::Releases => "release",
        }
    }
}

impl DriverLogClient {
    /// Fetch one option list, optionally narrowed by a `query` substring and
    /// by selections of the other filter dimensions.
    pub async fn fetch_list(
        &self,
        kind: ListKind,
        query: Option<&str>,
        params: &[(String, String)],
    ) -> Result<Vec<ListItem>> {
        let mut params = params.to_vec();
        if let Some(query) = query {
            params.push(("query".to_string(), query.to_string()));
        }

        let path = format!("list/{}", kind.path());
        let envelope: Value = self.get_json(&path, &params).await?;
        let items = envelope.get(kind.path()).cloned().ok_or_else(|| {
            DriverLensError::ApiError(format!("Missing '{}' key in list response", kind.path()))
        })?;
        let items: Vec<ListItem> = serde_json::from_value(items)?;
        info!("Fetched {} options from list/{}", items.len(), kind.path());
        Ok(items)
    }

    /// Look up one option by id; an unknown id resolves to `None`.
    pub async fn lookup_item(&self, kind: ListKind, id: &str) -> Result<Option<ListItem>> {
        let url = self.endpoint_url(&format!("list/{}/{id}", kind.path()))?;
        let response = self.client.get(url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DriverLensError::ApiError(format!(
                "Failed to look up {} '{id}': {status} - {body}",
                kind.param()
            )));
        }

        let envelope: Value = response.json().await?;
        let item = envelope.get(kind.item_key()).cloned().ok_or_else(|| {
            DriverLensError::ApiError(format!(
                "Missing '{}' key in lookup response",
                kind.item_key()
            ))
        })?;
        Ok(Some(serde_json::from_value(item)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_list_narrows_by_query_and_cross_filters() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/1.0/list/releases")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("vendor".into(), "acme".into()),
                mockito::Matcher::UrlEncoded("query".into(), "ju".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"releases": [{"id": "juno", "text": "Juno"}]}"#)
            .create_async()
            .await;

        let client = DriverLogClient::new(&server.url()).unwrap();
        let items = client
            .fetch_list(
                ListKind::Releases,
                Some("ju"),
                &[("vendor".to_string(), "acme".to_string())],
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(
            items,
            vec![ListItem {
                id: "juno".to_string(),
                text: "Juno".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_fetch_list_rejects_missing_envelope_key() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/1.0/list/vendors")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"unexpected": []}"#)
            .create_async()
            .await;

        let client = DriverLogClient::new(&server.url()).unwrap();
        let result = client.fetch_list(ListKind::Vendors, None, &[]).await;

        assert!(matches!(result, Err(DriverLensError::ApiError(_))));
    }

    #[tokio::test]
    async fn test_lookup_item_parses_singular_envelope() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/1.0/list/releases/juno")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"release": {"id": "juno", "text": "Juno"}}"#)
            .create_async()
            .await;

        let client = DriverLogClient::new(&server.url()).unwrap();
        let item = client.lookup_item(ListKind::Releases, "juno").await.unwrap();

        mock.assert_async().await;
        assert_eq!(item.unwrap().text, "Juno");
    }

    #[tokio::test]
    async fn test_lookup_item_resolves_unknown_id_to_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/1.0/list/project_ids/missing")
            .with_status(404)
            .create_async()
            .await;

        let client = DriverLogClient::new(&server.url()).unwrap();
        let item = client
            .lookup_item(ListKind::Projects, "missing")
            .await
            .unwrap();

        assert!(item.is_none());
    }
}
