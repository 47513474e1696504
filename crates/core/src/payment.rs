use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PaymentId(pub i64);

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
    Annual,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Weekly => write!(f, "weekly"),
            Frequency::Biweekly => write!(f, "biweekly"),
            Frequency::Monthly => write!(f, "monthly"),
            Frequency::Quarterly => write!(f, "quarterly"),
            Frequency::Annual => write!(f, "annual"),
        }
    }
}

/// A scheduled (or overdue) payment the family expects to make.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduledPayment {
    pub id: PaymentId,
    pub payee: String,
    pub description: String,
    /// Unsigned expected magnitude; transactions are compared after abs().
    pub amount: Money,
    pub due_date: NaiveDate,
    pub is_recurring: bool,
    pub frequency: Option<Frequency>,
    pub category: Option<String>,
}

impl ScheduledPayment {
    /// Lowercased payee + description, the keyword source for text scoring.
    pub fn combined_text(&self) -> String {
        format!("{} {}", self.payee, self.description)
            .trim()
            .to_lowercase()
    }
}
