//! File-drop queue commands.
//!
//! In file-drop mode the storefront leaves each order as
//! `ticket_<transactionId>.json`. These commands stand in for the consumer
//! when the companion bot is down or being debugged.

use std::path::Path;

use donut_market_core::value_text;
use donut_market_storefront::relay::{FileDropQueue, RelayError, WebhookRelay};

/// Outcome of a drain run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DrainSummary {
    /// Tickets forwarded or logged, then removed.
    pub handled: usize,
    /// Tickets left in place after a failure.
    pub kept: usize,
}

/// Print one line per pending ticket.
///
/// # Errors
///
/// Returns an error if the directory exists but cannot be listed.
#[allow(clippy::print_stdout)]
pub async fn list(dir: &Path) -> Result<(), RelayError> {
    let queue = FileDropQueue::new(dir);
    let pending = queue.pending().await?;

    if pending.is_empty() {
        println!("No pending tickets in {}", dir.display());
        return Ok(());
    }

    for path in pending {
        let name = path.file_name().map(|n| n.to_string_lossy().into_owned());
        let name = name.unwrap_or_default();
        match queue.read(&path).await {
            Ok(ticket) => println!(
                "{name}  buyer={} discord={} items={} total={}",
                value_text(&ticket.buyer),
                value_text(&ticket.discord),
                ticket.item_count(),
                ticket.total_amount,
            ),
            Err(e) => println!("{name}  unreadable: {e}"),
        }
    }

    Ok(())
}

/// Take every pending ticket off the queue.
///
/// With `forward_to`, each ticket is posted to that webhook and removed only
/// once the post succeeds. Without it, tickets are logged and removed.
/// Unreadable files are always left for a human to look at.
///
/// # Errors
///
/// Returns an error if the directory exists but cannot be listed.
pub async fn drain(dir: &Path, forward_to: Option<&str>) -> Result<DrainSummary, RelayError> {
    let queue = FileDropQueue::new(dir);
    let forwarder = forward_to.map(|url| WebhookRelay::new(url, url));
    let mut summary = DrainSummary::default();

    for path in queue.pending().await? {
        let ticket = match queue.read(&path).await {
            Ok(ticket) => ticket,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable ticket");
                summary.kept += 1;
                continue;
            }
        };

        let transaction_id = ticket.transaction_label();
        if let Some(relay) = &forwarder {
            if let Err(e) = relay.post(&ticket).await {
                tracing::warn!(
                    transaction_id = %transaction_id,
                    error = %e,
                    "Forward failed, ticket kept"
                );
                summary.kept += 1;
                continue;
            }
            tracing::info!(transaction_id = %transaction_id, "Ticket forwarded");
        } else {
            tracing::info!(
                transaction_id = %transaction_id,
                buyer = %value_text(&ticket.buyer),
                discord = %value_text(&ticket.discord),
                items = ticket.item_count(),
                "Ticket drained"
            );
        }

        queue.acknowledge(&path).await?;
        summary.handled += 1;
    }

    Ok(summary)
}
