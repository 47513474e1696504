use rust_decimal::Decimal;
use serde::Serialize;

use hearth_core::{Money, PaymentId, ScheduledPayment, Transaction, TransactionId};

/// Candidates summing below this are dropped, not retained at zero.
pub const MIN_CONFIDENCE: u8 = 30;

const AMOUNT_EXACT: u8 = 40;
const AMOUNT_CLOSE: u8 = 35;
const AMOUNT_APPROX: u8 = 20;
const DATE_SAME_DAY: u8 = 30;
const DATE_WITHIN_3: u8 = 25;
const DATE_WITHIN_7: u8 = 15;
const TEXT_PAYEE: u8 = 20;
const TEXT_KEYWORD_CAP: u8 = 15;
const RECURRING_BONUS: u8 = 10;

/// A scored suggestion pairing one transaction with one payment.
/// Ephemeral: rebuilt from scratch on every recomputation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchCandidate {
    pub transaction_id: TransactionId,
    pub payment_id: PaymentId,
    /// Clamped to [0, 100]; never below `MIN_CONFIDENCE`.
    pub confidence: u8,
    pub reasons: Vec<String>,
    pub amount_diff: Money,
    pub date_diff_days: i64,
}

/// Full T×P cross product. No ordering guarantee; downstream re-sorts.
pub fn candidate_pairs<'a>(
    transactions: &'a [Transaction],
    payments: &'a [ScheduledPayment],
) -> impl Iterator<Item = (&'a Transaction, &'a ScheduledPayment)> {
    transactions
        .iter()
        .flat_map(move |tx| payments.iter().map(move |p| (tx, p)))
}

/// Score every pair and rank the survivors by descending confidence.
pub fn suggest_matches(
    transactions: &[Transaction],
    payments: &[ScheduledPayment],
) -> Vec<MatchCandidate> {
    let mut candidates: Vec<MatchCandidate> = candidate_pairs(transactions, payments)
        .filter_map(|(tx, p)| score_pair(tx, p))
        .collect();
    crate::rank::rank(&mut candidates);
    candidates
}

/// Runs all four feature scorers, sums and clamps their contributions,
/// and keeps the pair only when it clears `MIN_CONFIDENCE`. The scorers
/// never short-circuit each other: every applicable reason is collected.
pub fn score_pair(tx: &Transaction, payment: &ScheduledPayment) -> Option<MatchCandidate> {
    let mut total: u32 = 0;
    let mut reasons = Vec::new();

    let amount_diff = (tx.amount.abs() - payment.amount).abs();
    let (points, reason) = amount_score(amount_diff, payment.amount);
    total += u32::from(points);
    reasons.extend(reason.map(str::to_string));

    let date_diff_days = (tx.date - payment.due_date).num_days().abs();
    let (points, reason) = date_score(date_diff_days);
    total += u32::from(points);
    reasons.extend(reason.map(str::to_string));

    let (points, reason) = text_score(tx, payment);
    total += u32::from(points);
    reasons.extend(reason);

    if payment.is_recurring {
        total += u32::from(RECURRING_BONUS);
        reasons.push("Recurring payment pattern".to_string());
    }

    let confidence = total.min(100) as u8;
    if confidence < MIN_CONFIDENCE {
        return None;
    }

    Some(MatchCandidate {
        transaction_id: tx.id,
        payment_id: payment.id,
        confidence,
        reasons,
        amount_diff,
        date_diff_days,
    })
}

/// Amount proximity, weight 40 of 100. The "close" band scales with the
/// expected amount but never drops below $5.
fn amount_score(diff: Money, expected: Money) -> (u8, Option<&'static str>) {
    if diff.is_zero() {
        return (AMOUNT_EXACT, Some("Exact amount match"));
    }

    let expected = expected.as_decimal();
    let close = (expected * Decimal::new(5, 2)).max(Decimal::from(5));
    if diff.as_decimal() <= close {
        return (AMOUNT_CLOSE, Some("Close amount match"));
    }
    if diff.as_decimal() <= expected * Decimal::new(10, 2) {
        return (AMOUNT_APPROX, Some("Approximate amount match"));
    }
    (0, None)
}

/// Date proximity, weight 30. Dates are day-granular, so the bands are
/// whole-day comparisons.
fn date_score(diff_days: i64) -> (u8, Option<&'static str>) {
    match diff_days {
        0..=1 => (DATE_SAME_DAY, Some("Same day")),
        2..=3 => (DATE_WITHIN_3, Some("Within 3 days")),
        4..=7 => (DATE_WITHIN_7, Some("Within a week")),
        _ => (0, None),
    }
}

/// Text similarity, weight 20. A full payee hit in the transaction text
/// takes the whole weight; otherwise partial credit per shared keyword
/// (tokens longer than 3 chars), capped at 15.
fn text_score(tx: &Transaction, payment: &ScheduledPayment) -> (u8, Option<String>) {
    let haystack = tx.combined_text();
    let payee = payment.payee.trim().to_lowercase();
    if !payee.is_empty() && haystack.contains(&payee) {
        return (TEXT_PAYEE, Some("Payee name match".to_string()));
    }

    let tx_tokens: Vec<&str> = haystack.split_whitespace().collect();
    let needle = payment.combined_text();
    let matching = needle
        .split_whitespace()
        .filter(|t| t.len() > 3)
        .filter(|t| tx_tokens.iter().any(|w| w.contains(*t) || t.contains(w)))
        .count();

    if matching == 0 {
        return (0, None);
    }
    let points = (matching * 5).min(usize::from(TEXT_KEYWORD_CAP)) as u8;
    (
        points,
        Some(format!("Similar description ({matching} keywords)")),
    )
}
