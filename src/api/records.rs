use log::info;
use serde::Deserialize;

use super::client::DriverLogClient;
use crate::error::Result;
use crate::models::ResultRecord;

#[derive(Debug, Deserialize)]
struct RecordsEnvelope {
    data: Vec<ResultRecord>,
}

impl DriverLogClient {
    /// Fetch test result records matching the given request parameters.
    pub async fn fetch_records(&self, params: &[(String, String)]) -> Result<Vec<ResultRecord>> {
        let envelope: RecordsEnvelope = self.get_json("records", params).await?;
        info!("Fetched {} test result records", envelope.data.len());
        Ok(envelope.data)
    }
}
