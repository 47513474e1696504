use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Context;

use hearth_client::ApiClient;
use hearth_core::{ScheduledPayment, Transaction, TransactionId};
use hearth_match::{filter_candidates, CandidateFilter, MatchCandidate, MatchEngine, SelectionState};

mod config;

use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = Config::load(config_path.as_deref()).context("loading configuration")?;

    let client = ApiClient::new(&config.api_url, &config.api_token);

    let (transactions, payments) = tokio::try_join!(
        client.fetch_unmatched_transactions(),
        client.fetch_scheduled_payments(),
    )
    .context("fetching transactions and payments")?;

    tracing::info!(
        transactions = transactions.len(),
        payments = payments.len(),
        "fetched unmatched data"
    );

    let mut engine = MatchEngine::new();
    let suggestions = engine.suggestions(&transactions, &payments);

    if suggestions.is_empty() {
        println!("No matches.");
        return Ok(());
    }

    let filter = CandidateFilter {
        search: config.search.clone(),
        min_confidence: config.min_confidence,
    };
    let visible = filter_candidates(suggestions, &transactions, &payments, &filter);

    print_suggestions(&visible, &transactions, &payments);

    if let Some(threshold) = config.auto_confirm_at {
        auto_confirm_and_submit(&client, &visible, &transactions, threshold).await?;
    }

    Ok(())
}

fn print_suggestions(
    candidates: &[&MatchCandidate],
    transactions: &[Transaction],
    payments: &[ScheduledPayment],
) {
    let tx_by_id: HashMap<_, _> = transactions.iter().map(|t| (t.id, t)).collect();
    let pay_by_id: HashMap<_, _> = payments.iter().map(|p| (p.id, p)).collect();

    println!("{:<5} {:<30} {:<25} {:>6}  reasons", "conf", "transaction", "payment", "Δ amt");
    for c in candidates {
        let (Some(tx), Some(pay)) = (tx_by_id.get(&c.transaction_id), pay_by_id.get(&c.payment_id))
        else {
            continue;
        };
        println!(
            "{:<5} {:<30} {:<25} {:>6}  {}",
            c.confidence,
            truncate(&tx.description, 30),
            truncate(&pay.payee, 25),
            c.amount_diff.to_string(),
            c.reasons.join("; "),
        );
    }
}

async fn auto_confirm_and_submit(
    client: &ApiClient,
    candidates: &[&MatchCandidate],
    transactions: &[Transaction],
    threshold: u8,
) -> anyhow::Result<()> {
    let tx_by_id: HashMap<TransactionId, &Transaction> =
        transactions.iter().map(|t| (t.id, t)).collect();

    let mut selection = SelectionState::new();
    for candidate in candidates {
        if candidate.confidence < threshold {
            continue;
        }
        if let Some(tx) = tx_by_id.get(&candidate.transaction_id) {
            selection.toggle_suggestion(candidate, tx);
        }
    }

    if selection.is_empty() {
        tracing::info!(threshold, "nothing at or above the auto-confirm threshold");
        return Ok(());
    }

    let batch = selection.submission_batch();
    match client.submit_matches(&batch).await {
        Ok(()) => {
            let submitted = selection.complete_submission();
            tracing::info!(count = submitted.len(), "submitted confirmed matches");
            println!("Submitted {} match(es).", submitted.len());
            Ok(())
        }
        Err(e) => {
            // Selection is left intact so a retry needs no re-selection.
            tracing::warn!(
                pending = selection.len(),
                "submission failed; selections preserved: {e}"
            );
            Err(e).context("submitting confirmed matches")
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
