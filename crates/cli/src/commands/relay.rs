//! Test tickets for the companion bot.

use chrono::Utc;
use donut_market_core::Ticket;
use donut_market_storefront::relay::{RelayError, WebhookRelay};

/// Send the sample ticket and print the bot's answer.
///
/// With `check_health` the health endpoint is checked first, exactly as the
/// storefront does for real orders.
///
/// # Errors
///
/// Returns the relay error if the bot is unreachable or rejects the ticket.
#[allow(clippy::print_stdout)]
pub async fn test_ticket(webhook: &str, health: &str, check_health: bool) -> Result<(), RelayError> {
    let relay = WebhookRelay::new(webhook, health);
    let ticket = Ticket::sample(Utc::now().timestamp_millis());

    tracing::info!(
        transaction_id = %ticket.transaction_label(),
        webhook,
        check_health,
        "Sending test ticket"
    );

    let response = if check_health {
        relay.deliver(&ticket).await?
    } else {
        relay.post(&ticket).await?
    };

    println!("{response:#}");
    Ok(())
}
