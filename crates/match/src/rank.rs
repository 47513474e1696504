use std::collections::HashMap;

use hearth_core::{PaymentId, ScheduledPayment, Transaction, TransactionId};

use crate::scoring::MatchCandidate;

/// Descending confidence; ties break by ascending transaction id then
/// payment id so equal-confidence output is deterministic.
pub fn rank(candidates: &mut [MatchCandidate]) {
    candidates.sort_by(|a, b| {
        b.confidence
            .cmp(&a.confidence)
            .then(a.transaction_id.cmp(&b.transaction_id))
            .then(a.payment_id.cmp(&b.payment_id))
    });
}

/// Display-side filters. Both are optional and compose; neither reorders
/// the ranked list.
#[derive(Debug, Clone, Default)]
pub struct CandidateFilter {
    /// Case-insensitive substring over transaction description/merchant
    /// and payment payee/description.
    pub search: Option<String>,
    /// User-adjustable cutoff on top of the engine's retention threshold.
    pub min_confidence: Option<u8>,
}

impl CandidateFilter {
    pub fn is_empty(&self) -> bool {
        self.search.as_deref().is_none_or(str::is_empty) && self.min_confidence.is_none()
    }
}

/// Applies `filter` to an already-ranked candidate list, preserving order.
/// Candidates whose transaction or payment is missing from the input
/// lists are dropped.
pub fn filter_candidates<'a>(
    candidates: &'a [MatchCandidate],
    transactions: &[Transaction],
    payments: &[ScheduledPayment],
    filter: &CandidateFilter,
) -> Vec<&'a MatchCandidate> {
    let tx_text: HashMap<TransactionId, String> = transactions
        .iter()
        .map(|t| (t.id, t.combined_text()))
        .collect();
    let pay_text: HashMap<PaymentId, String> = payments
        .iter()
        .map(|p| (p.id, p.combined_text()))
        .collect();

    let needle = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    candidates
        .iter()
        .filter(|c| {
            filter
                .min_confidence
                .is_none_or(|min| c.confidence >= min)
        })
        .filter(|c| {
            let (Some(tx), Some(pay)) = (tx_text.get(&c.transaction_id), pay_text.get(&c.payment_id))
            else {
                return false;
            };
            match &needle {
                Some(n) => tx.contains(n) || pay.contains(n),
                None => true,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use hearth_core::{BankAccountId, Money};

    fn candidate(tx: i64, pay: i64, confidence: u8) -> MatchCandidate {
        MatchCandidate {
            transaction_id: TransactionId(tx),
            payment_id: PaymentId(pay),
            confidence,
            reasons: vec![],
            amount_diff: Money::zero(),
            date_diff_days: 0,
        }
    }

    fn tx(id: i64, desc: &str, merchant: Option<&str>) -> Transaction {
        Transaction {
            id: TransactionId(id),
            bank_account_id: BankAccountId(1),
            amount: Money::from_cents(-1000),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            description: desc.to_string(),
            merchant_name: merchant.map(str::to_string),
            pending: false,
            category: None,
        }
    }

    fn payment(id: i64, payee: &str) -> ScheduledPayment {
        ScheduledPayment {
            id: PaymentId(id),
            payee: payee.to_string(),
            description: String::new(),
            amount: Money::from_cents(1000),
            due_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            is_recurring: false,
            frequency: None,
            category: None,
        }
    }

    #[test]
    fn rank_is_non_increasing_in_confidence() {
        let mut cands = vec![candidate(1, 1, 40), candidate(2, 1, 90), candidate(3, 1, 65)];
        rank(&mut cands);
        let confidences: Vec<u8> = cands.iter().map(|c| c.confidence).collect();
        assert_eq!(confidences, vec![90, 65, 40]);
    }

    #[test]
    fn equal_confidence_breaks_ties_by_ids() {
        let mut cands = vec![
            candidate(2, 5, 70),
            candidate(1, 9, 70),
            candidate(1, 3, 70),
        ];
        rank(&mut cands);
        let keys: Vec<(i64, i64)> = cands
            .iter()
            .map(|c| (c.transaction_id.0, c.payment_id.0))
            .collect();
        assert_eq!(keys, vec![(1, 3), (1, 9), (2, 5)]);
    }

    #[test]
    fn search_filter_matches_either_side() {
        let cands = vec![candidate(1, 10, 80), candidate(2, 11, 70)];
        let txs = vec![tx(1, "NETFLIX.COM", None), tx(2, "SHELL OIL", Some("Shell"))];
        let pays = vec![payment(10, "Netflix"), payment(11, "Shell Gas")];

        let filter = CandidateFilter {
            search: Some("netflix".to_string()),
            min_confidence: None,
        };
        let out = filter_candidates(&cands, &txs, &pays, &filter);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].transaction_id, TransactionId(1));

        // Matching on the payment side works too.
        let filter = CandidateFilter {
            search: Some("gas".to_string()),
            min_confidence: None,
        };
        let out = filter_candidates(&cands, &txs, &pays, &filter);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].payment_id, PaymentId(11));
    }

    #[test]
    fn min_confidence_filter_composes_with_search() {
        let cands = vec![candidate(1, 10, 80), candidate(2, 11, 45)];
        let txs = vec![tx(1, "SHELL STATION", None), tx(2, "SHELL OIL", None)];
        let pays = vec![payment(10, "Shell"), payment(11, "Shell")];

        let filter = CandidateFilter {
            search: Some("shell".to_string()),
            min_confidence: Some(60),
        };
        let out = filter_candidates(&cands, &txs, &pays, &filter);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].confidence, 80);
    }

    #[test]
    fn filters_preserve_ranked_order() {
        let mut cands = vec![
            candidate(3, 10, 50),
            candidate(1, 10, 90),
            candidate(2, 10, 70),
        ];
        rank(&mut cands);
        let txs = vec![tx(1, "A", None), tx(2, "B", None), tx(3, "C", None)];
        let pays = vec![payment(10, "P")];
        let out = filter_candidates(&cands, &txs, &pays, &CandidateFilter::default());
        let confidences: Vec<u8> = out.iter().map(|c| c.confidence).collect();
        assert_eq!(confidences, vec![90, 70, 50]);
    }

    #[test]
    fn blank_search_matches_everything() {
        let cands = vec![candidate(1, 10, 80)];
        let txs = vec![tx(1, "A", None)];
        let pays = vec![payment(10, "P")];
        let filter = CandidateFilter {
            search: Some("   ".to_string()),
            min_confidence: None,
        };
        assert_eq!(filter_candidates(&cands, &txs, &pays, &filter).len(), 1);
    }

    #[test]
    fn candidate_with_unknown_ids_is_dropped() {
        let cands = vec![candidate(99, 10, 80)];
        let txs = vec![tx(1, "A", None)];
        let pays = vec![payment(10, "P")];
        assert!(filter_candidates(&cands, &txs, &pays, &CandidateFilter::default()).is_empty());
    }
}
