use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TransactionId(pub i64);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BankAccountId(pub i64);

/// An imported bank transaction. Read-only to the match engine; the
/// "unmatched" predicate and any account/date filtering belong to the
/// transaction source, not here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub bank_account_id: BankAccountId,
    /// Signed: negative for outflows, positive for inflows.
    pub amount: Money,
    pub date: NaiveDate,
    pub description: String,
    pub merchant_name: Option<String>,
    pub pending: bool,
    pub category: Option<String>,
}

impl Transaction {
    /// Lowercased merchant + description, the haystack for payee and
    /// keyword matching.
    pub fn combined_text(&self) -> String {
        format!(
            "{} {}",
            self.merchant_name.as_deref().unwrap_or_default(),
            self.description
        )
        .trim()
        .to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(merchant: Option<&str>, desc: &str) -> Transaction {
        Transaction {
            id: TransactionId(1),
            bank_account_id: BankAccountId(1),
            amount: Money::from_cents(-4500),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            description: desc.to_string(),
            merchant_name: merchant.map(str::to_string),
            pending: false,
            category: None,
        }
    }

    #[test]
    fn combined_text_joins_merchant_and_description() {
        assert_eq!(
            tx(Some("ACME"), "ACME UTILITY").combined_text(),
            "acme acme utility"
        );
    }

    #[test]
    fn combined_text_without_merchant_has_no_leading_space() {
        assert_eq!(tx(None, "ACME UTILITY").combined_text(), "acme utility");
    }
}
