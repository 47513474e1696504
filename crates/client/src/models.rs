use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use hearth_core::{
    BankAccountId, Frequency, Money, PaymentId, ScheduledPayment, Transaction, TransactionId,
};
use hearth_match::ConfirmedMatch;

/// A record the collaborator sent without a field we require. The record
/// is skipped, not fatal: the rest of the batch still goes through.
#[derive(Debug, Clone, Error)]
#[error("{kind} {id} is missing required field `{field}`")]
pub struct InvalidRecord {
    pub kind: &'static str,
    pub id: i64,
    pub field: &'static str,
}

/// Wire shape of a bank transaction as the transaction source returns
/// it. Everything beyond the id is optional here; conversion decides
/// what is actually required.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDto {
    pub id: i64,
    pub bank_account_id: Option<i64>,
    pub amount: Option<Decimal>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub merchant_name: Option<String>,
    #[serde(default)]
    pub pending: bool,
    pub category: Option<String>,
}

impl TryFrom<TransactionDto> for Transaction {
    type Error = InvalidRecord;

    fn try_from(dto: TransactionDto) -> Result<Self, Self::Error> {
        let missing = |field| InvalidRecord {
            kind: "transaction",
            id: dto.id,
            field,
        };
        Ok(Transaction {
            id: TransactionId(dto.id),
            bank_account_id: BankAccountId(dto.bank_account_id.ok_or(missing("bankAccountId"))?),
            amount: Money::from_decimal(dto.amount.ok_or(missing("amount"))?),
            date: dto.date.ok_or(missing("date"))?,
            description: dto.description.unwrap_or_default(),
            merchant_name: dto.merchant_name,
            pending: dto.pending,
            category: dto.category,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDto {
    pub id: i64,
    pub payee: Option<String>,
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_recurring: bool,
    pub frequency: Option<Frequency>,
    pub category: Option<String>,
}

impl TryFrom<PaymentDto> for ScheduledPayment {
    type Error = InvalidRecord;

    fn try_from(dto: PaymentDto) -> Result<Self, Self::Error> {
        let missing = |field| InvalidRecord {
            kind: "payment",
            id: dto.id,
            field,
        };
        Ok(ScheduledPayment {
            id: PaymentId(dto.id),
            payee: dto.payee.ok_or(missing("payee"))?,
            description: dto.description.unwrap_or_default(),
            amount: Money::from_decimal(dto.amount.ok_or(missing("amount"))?),
            due_date: dto.due_date.ok_or(missing("dueDate"))?,
            is_recurring: dto.is_recurring,
            frequency: dto.frequency,
            category: dto.category,
        })
    }
}

/// One entry of the atomic batch POSTed to the match submission
/// endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSubmission {
    pub transaction_id: TransactionId,
    pub payment_id: PaymentId,
    pub matched_amount: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<&ConfirmedMatch> for MatchSubmission {
    fn from(m: &ConfirmedMatch) -> Self {
        MatchSubmission {
            transaction_id: m.transaction_id,
            payment_id: m.payment_id,
            matched_amount: m.matched_amount,
            notes: m.note.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_dto_converts_when_complete() {
        let dto: TransactionDto = serde_json::from_value(serde_json::json!({
            "id": 7,
            "bankAccountId": 2,
            "amount": "-45.00",
            "date": "2024-03-01",
            "description": "ACME UTILITY",
            "merchantName": "ACME",
            "pending": false
        }))
        .unwrap();
        let tx = Transaction::try_from(dto).unwrap();
        assert_eq!(tx.id, TransactionId(7));
        assert_eq!(tx.amount, Money::from_cents(-4500));
        assert_eq!(tx.merchant_name.as_deref(), Some("ACME"));
    }

    #[test]
    fn transaction_without_date_fails_closed() {
        let dto: TransactionDto = serde_json::from_value(serde_json::json!({
            "id": 7,
            "bankAccountId": 2,
            "amount": "-45.00",
            "description": "ACME UTILITY"
        }))
        .unwrap();
        let err = Transaction::try_from(dto).unwrap_err();
        assert_eq!(err.field, "date");
    }

    #[test]
    fn payment_without_amount_fails_closed() {
        let dto: PaymentDto = serde_json::from_value(serde_json::json!({
            "id": 3,
            "payee": "ACME Utility Co",
            "dueDate": "2024-03-01",
            "isRecurring": true
        }))
        .unwrap();
        let err = ScheduledPayment::try_from(dto).unwrap_err();
        assert_eq!(err.field, "amount");
    }

    #[test]
    fn submission_serializes_camel_case_and_drops_empty_notes() {
        let with_note = MatchSubmission {
            transaction_id: TransactionId(7),
            payment_id: PaymentId(3),
            matched_amount: Money::from_cents(4500),
            notes: Some("Manually matched".to_string()),
        };
        let value = serde_json::to_value(&with_note).unwrap();
        assert_eq!(value["transactionId"], 7);
        assert_eq!(value["paymentId"], 3);
        assert_eq!(value["notes"], "Manually matched");

        let without_note = MatchSubmission {
            notes: None,
            ..with_note
        };
        let value = serde_json::to_value(&without_note).unwrap();
        assert!(value.get("notes").is_none());
    }
}
