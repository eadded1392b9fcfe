//! Checkout quotes, driven through the same purchase modal the storefront
//! page models.
//!
//! ```bash
//! dm-cli quote --product Elytra --quantity 2 --referral FRIEND
//! dm-cli quote --product Elytra --username Steve
//! ```

use donut_market_core::{
    ModalState, Notification, NotificationKind, PendingPurchase, PurchaseModal, QuoteError,
};

/// Open the modal on `product` and type the inputs in.
fn fill(product: &str, quantity: &str, referral: &str) -> Result<PurchaseModal, QuoteError> {
    let mut modal = PurchaseModal::default();
    modal.open(product)?;
    modal.set_quantity(quantity);
    modal.set_referral_code(referral);
    Ok(modal)
}

/// Render the open modal's quote.
fn render(modal: &PurchaseModal) -> String {
    let ModalState::Open { product, quote, .. } = modal.state() else {
        return String::new();
    };
    format!(
        "{} ({}) x{}\n  Subtotal: ${}\n  Discount: ${}\n  Total:    ${}",
        product.name,
        product.price_label(),
        quote.quantity,
        quote.subtotal.display_amount(),
        quote.discount.display_amount(),
        quote.total.display_amount(),
    )
}

fn notice_line(notification: &Notification) -> String {
    let tag = match notification.kind {
        NotificationKind::Success => "ok",
        NotificationKind::Error => "error",
        NotificationKind::Info => "info",
    };
    format!("[{tag}] {}", notification.message)
}

/// Print the quote for a catalog product.
///
/// With a `username` the purchase is submitted too, including the simulated
/// confirmation delay.
///
/// # Errors
///
/// Returns [`QuoteError::UnknownProduct`] for names not in the shop.
#[allow(clippy::print_stdout)]
pub async fn print(
    product: &str,
    quantity: &str,
    referral: &str,
    username: Option<&str>,
) -> Result<(), QuoteError> {
    let mut modal = fill(product, quantity, referral)?;
    println!("{}", render(&modal));

    let Some(username) = username else {
        return Ok(());
    };
    modal.set_username(username);

    match modal.submit() {
        Ok(pending) => {
            println!("{}", notice_line(&pending.processing_notice()));
            tokio::time::sleep(PendingPurchase::CONFIRMATION_DELAY).await;
            println!("{}", notice_line(&modal.confirm(pending)));
        }
        Err(e) => {
            if let Some(notification) = e.notification() {
                println!("{}", notice_line(&notification));
            }
        }
    }
    Ok(())
}
