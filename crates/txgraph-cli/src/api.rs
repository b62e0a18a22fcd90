//! HTTP client for a running txgraph server.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use txgraph_core::business::model::{Business, TransactionCount};

/// `{ "success": true, "data": ... }`
#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn list_businesses(&self) -> Result<Vec<Business>> {
        self.get("/api/businesses").await
    }

    pub async fn transaction_count(&self, business_id: &str) -> Result<u64> {
        let count: TransactionCount = self
            .get(&format!("/api/businesses/{}/transaction-count", business_id))
            .await?;
        Ok(count.transaction_count)
    }

    /// POST one transaction; `timestamp` is epoch milliseconds.
    pub async fn post_transaction(&self, from: &str, to: &str, amount: f64, timestamp: i64) -> Result<()> {
        let body = json!({
            "from": from,
            "to": to,
            "amount": amount,
            "timestamp": timestamp,
        });

        let response = self
            .client
            .post(format!("{}/api/transactions", self.base_url))
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Failed to reach {}. Is `txgraph serve` running?", self.base_url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("Transaction rejected ({}): {}", status, body);
        }
        Ok(())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .with_context(|| format!("Failed to reach {}. Is `txgraph serve` running?", self.base_url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("GET {} failed ({}): {}", path, status, body);
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .with_context(|| format!("Failed to parse response from {}", path))?;
        Ok(envelope.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_drops_trailing_slash() {
        assert_eq!(ApiClient::new("http://127.0.0.1:3000/").base_url(), "http://127.0.0.1:3000");
    }

    #[test]
    fn envelope_unwraps_data() {
        let body = r#"{"success":true,"data":{"businessId":"b1","transactionCount":3}}"#;
        let envelope: Envelope<TransactionCount> = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.data.transaction_count, 3);
    }
}
