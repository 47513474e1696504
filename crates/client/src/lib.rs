pub mod client;
pub mod models;

pub use client::{ApiClient, ClientError};
pub use models::{InvalidRecord, MatchSubmission, PaymentDto, TransactionDto};
