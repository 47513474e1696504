use std::hash::{DefaultHasher, Hash, Hasher};

use hearth_core::{ScheduledPayment, Transaction};

use crate::scoring::{suggest_matches, MatchCandidate};

/// Memoized wrapper around the full generate → score → rank pass.
///
/// The O(T×P) recompute only runs when the transaction or payment list
/// actually changes; unrelated state churn (search terms, selections)
/// hits the cache. One slot is enough: the UI only ever shows one
/// (transactions, payments) snapshot at a time.
#[derive(Debug, Default)]
pub struct MatchEngine {
    cache: Option<(u64, Vec<MatchCandidate>)>,
    recomputes: u64,
}

impl MatchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ranked suggestions for the given inputs, recomputing only when
    /// the inputs' fingerprint changes.
    pub fn suggestions(
        &mut self,
        transactions: &[Transaction],
        payments: &[ScheduledPayment],
    ) -> &[MatchCandidate] {
        let key = fingerprint(transactions, payments);
        let fresh = matches!(&self.cache, Some((cached, _)) if *cached == key);
        if fresh {
            tracing::debug!(key, "suggestion cache hit");
        } else {
            let ranked = suggest_matches(transactions, payments);
            tracing::debug!(
                key,
                transactions = transactions.len(),
                payments = payments.len(),
                candidates = ranked.len(),
                "recomputed match suggestions"
            );
            self.cache = Some((key, ranked));
            self.recomputes += 1;
        }
        match &self.cache {
            Some((_, ranked)) => ranked,
            None => &[],
        }
    }

    /// How many times the full pass has actually run.
    pub fn recompute_count(&self) -> u64 {
        self.recomputes
    }
}

fn fingerprint(transactions: &[Transaction], payments: &[ScheduledPayment]) -> u64 {
    let mut hasher = DefaultHasher::new();
    transactions.hash(&mut hasher);
    payments.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use hearth_core::{BankAccountId, Money, PaymentId, TransactionId};

    fn tx(id: i64, cents: i64) -> Transaction {
        Transaction {
            id: TransactionId(id),
            bank_account_id: BankAccountId(1),
            amount: Money::from_cents(cents),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            description: "RENT".to_string(),
            merchant_name: None,
            pending: false,
            category: None,
        }
    }

    fn payment(id: i64, cents: i64) -> ScheduledPayment {
        ScheduledPayment {
            id: PaymentId(id),
            payee: "Landlord".to_string(),
            description: String::new(),
            amount: Money::from_cents(cents),
            due_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            is_recurring: false,
            frequency: None,
            category: None,
        }
    }

    #[test]
    fn unchanged_inputs_reuse_the_cache() {
        let mut engine = MatchEngine::new();
        let txs = vec![tx(1, -4500)];
        let pays = vec![payment(10, 4500)];

        let first = engine.suggestions(&txs, &pays).to_vec();
        let second = engine.suggestions(&txs, &pays).to_vec();
        assert_eq!(first, second);
        assert_eq!(engine.recompute_count(), 1);
    }

    #[test]
    fn changed_transactions_invalidate_the_cache() {
        let mut engine = MatchEngine::new();
        let pays = vec![payment(10, 4500)];

        engine.suggestions(&[tx(1, -4500)], &pays);
        engine.suggestions(&[tx(1, -4500), tx(2, -4500)], &pays);
        assert_eq!(engine.recompute_count(), 2);
    }

    #[test]
    fn changed_payments_invalidate_the_cache() {
        let mut engine = MatchEngine::new();
        let txs = vec![tx(1, -4500)];

        engine.suggestions(&txs, &[payment(10, 4500)]);
        engine.suggestions(&txs, &[payment(10, 4600)]);
        assert_eq!(engine.recompute_count(), 2);
    }

    #[test]
    fn empty_inputs_are_cached_too() {
        let mut engine = MatchEngine::new();
        assert!(engine.suggestions(&[], &[]).is_empty());
        assert!(engine.suggestions(&[], &[]).is_empty());
        assert_eq!(engine.recompute_count(), 1);
    }
}
