use log::info;
use serde::Deserialize;

use super::client::DriverLogClient;
use crate::error::Result;
use crate::models::DriverDescriptor;

#[derive(Debug, Deserialize)]
struct DriversEnvelope {
    drivers: Vec<DriverDescriptor>,
}

impl DriverLogClient {
    /// Fetch the driver catalog matching the given request parameters.
    pub async fn fetch_drivers(&self, params: &[(String, String)]) -> Result<Vec<DriverDescriptor>> {
        let envelope: DriversEnvelope = self.get_json("drivers", params).await?;
        info!("Fetched {} drivers", envelope.drivers.len());
        Ok(envelope.drivers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_drivers_parses_envelope() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/1.0/drivers")
            .match_query(mockito::Matcher::UrlEncoded("vendor".into(), "acme".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"drivers": [{"project_id": "openstack/cinder",
                    "vendor": "Acme", "name": "Acme ISCSI",
                    "os_versions_map": {"master": {"success": true}}}]}"#,
            )
            .create_async()
            .await;

        let client = DriverLogClient::new(&server.url()).unwrap();
        let drivers = client
            .fetch_drivers(&[("vendor".to_string(), "acme".to_string())])
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(drivers.len(), 1);
        assert_eq!(drivers[0].name, "Acme ISCSI");
        assert_eq!(
            drivers[0].os_versions_map.get("master").unwrap().success,
            Some(true)
        );
    }
}
