use serde::de::DeserializeOwned;
use thiserror::Error;

use hearth_core::{ScheduledPayment, Transaction};
use hearth_match::ConfirmedMatch;

use crate::models::{MatchSubmission, PaymentDto, TransactionDto};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// HTTP client for the three collaborators the engine depends on:
/// the transaction source, the payment source, and the batch match
/// submission endpoint. Authenticates with the hosting app's bearer
/// token; owns no state beyond the connection pool.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        ApiClient {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// Transactions not yet linked to a payment. The "unmatched"
    /// predicate and any account/date filtering are the server's job.
    /// Malformed records are skipped with a warning, not fatal.
    pub async fn fetch_unmatched_transactions(&self) -> Result<Vec<Transaction>, ClientError> {
        let dtos: Vec<TransactionDto> = self.get_json("/api/transactions/unmatched").await?;
        Ok(convert_valid(dtos))
    }

    /// Scheduled and overdue payments awaiting a matching transaction.
    pub async fn fetch_scheduled_payments(&self) -> Result<Vec<ScheduledPayment>, ClientError> {
        let dtos: Vec<PaymentDto> = self.get_json("/api/payments/scheduled").await?;
        Ok(convert_valid(dtos))
    }

    /// Submits the whole confirmed set in one atomic call. Success or
    /// failure is batch-level only; on failure the caller keeps its
    /// selection state for retry.
    pub async fn submit_matches(&self, batch: &[ConfirmedMatch]) -> Result<(), ClientError> {
        let payload: Vec<MatchSubmission> = batch.iter().map(MatchSubmission::from).collect();
        let response = self
            .http
            .post(format!("{}/api/payment-matches", self.base_url))
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self
            .http
            .get(format!("{}{path}", self.base_url))
            .bearer_auth(&self.token)
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Status {
        status: status.as_u16(),
        body,
    })
}

fn convert_valid<D, T>(dtos: Vec<D>) -> Vec<T>
where
    T: TryFrom<D, Error = crate::models::InvalidRecord>,
{
    dtos.into_iter()
        .filter_map(|dto| match T::try_from(dto) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("skipping malformed record: {e}");
                None
            }
        })
        .collect()
}
