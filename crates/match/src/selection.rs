use std::collections::BTreeMap;

use serde::Serialize;

use hearth_core::{Money, PaymentId, Transaction, TransactionId};

use crate::scoring::MatchCandidate;

/// A user-accepted pairing queued for batch submission. Transient client
/// state: destroyed on submission success or explicit deselection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmedMatch {
    pub transaction_id: TransactionId,
    pub payment_id: PaymentId,
    /// Always the absolute transaction amount, regardless of sign.
    pub matched_amount: Money,
    pub note: Option<String>,
}

/// Tracks confirmed pairings prior to submission. At most one entry per
/// (transaction, payment) key; each pair is either Unselected or
/// Selected, nothing in between.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    confirmed: BTreeMap<(TransactionId, PaymentId), ConfirmedMatch>,
    /// Manual pairings by transaction, so un-pairing doesn't need the
    /// payment id.
    manual: BTreeMap<TransactionId, PaymentId>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.confirmed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.confirmed.is_empty()
    }

    pub fn is_selected(&self, transaction_id: TransactionId, payment_id: PaymentId) -> bool {
        self.confirmed.contains_key(&(transaction_id, payment_id))
    }

    /// Toggle-on-reselect: selecting an already-selected suggestion
    /// removes it. Returns `true` when the pair ends up selected.
    pub fn toggle_suggestion(&mut self, candidate: &MatchCandidate, transaction: &Transaction) -> bool {
        let key = (candidate.transaction_id, candidate.payment_id);
        if self.confirmed.remove(&key).is_some() {
            // Keep the manual map mirrored when the deselected pair was
            // a manual one.
            if self.manual.get(&candidate.transaction_id) == Some(&candidate.payment_id) {
                self.manual.remove(&candidate.transaction_id);
            }
            return false;
        }
        self.confirmed.insert(
            key,
            ConfirmedMatch {
                transaction_id: candidate.transaction_id,
                payment_id: candidate.payment_id,
                matched_amount: transaction.amount.abs(),
                note: Some(format!(
                    "Matched with {}% confidence",
                    candidate.confidence
                )),
            },
        );
        true
    }

    /// Explicitly pair a transaction with a payment outside the
    /// suggestion list. Re-pairing an already-paired transaction moves
    /// it to the new payment.
    pub fn pair_manual(&mut self, transaction: &Transaction, payment_id: PaymentId) {
        if let Some(previous) = self.manual.insert(transaction.id, payment_id) {
            self.confirmed.remove(&(transaction.id, previous));
        }
        self.confirmed.insert(
            (transaction.id, payment_id),
            ConfirmedMatch {
                transaction_id: transaction.id,
                payment_id,
                matched_amount: transaction.amount.abs(),
                note: Some("Manually matched".to_string()),
            },
        );
    }

    /// Removes a manual pairing. Returns `false` when the transaction
    /// had none.
    pub fn unpair_manual(&mut self, transaction_id: TransactionId) -> bool {
        match self.manual.remove(&transaction_id) {
            Some(payment_id) => {
                self.confirmed.remove(&(transaction_id, payment_id));
                true
            }
            None => false,
        }
    }

    pub fn manual_payment_for(&self, transaction_id: TransactionId) -> Option<PaymentId> {
        self.manual.get(&transaction_id).copied()
    }

    /// Snapshot of the confirmed set in deterministic key order, for the
    /// single atomic submission call.
    pub fn submission_batch(&self) -> Vec<ConfirmedMatch> {
        self.confirmed.values().cloned().collect()
    }

    /// Clears all selection state after a *successful* submission and
    /// reports what was submitted. On failure the caller must not call
    /// this, so the selection survives for retry.
    pub fn complete_submission(&mut self) -> Vec<ConfirmedMatch> {
        self.manual.clear();
        std::mem::take(&mut self.confirmed).into_values().collect()
    }
}
