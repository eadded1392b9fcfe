//! Purchase modal state machine.
//!
//! The modal is either closed or open with one product bound to it. Every
//! input change recomputes the [`Quote`]. Submitting does not place an order:
//! it validates the username and hands back a [`PendingPurchase`] that the
//! page confirms after [`PendingPurchase::CONFIRMATION_DELAY`].

use std::time::Duration;

use serde::Serialize;

use crate::{Catalog, Product, Quote, QuoteError};

/// Notification severity, which drives its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

/// A toast message. Showing one replaces whatever is on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    /// How long a notification stays on screen.
    pub const AUTO_DISMISS: Duration = Duration::from_secs(5);

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Info,
            message: message.into(),
        }
    }
}

/// Form inputs while the modal is open, kept as raw strings like the DOM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalForm {
    pub username: String,
    pub quantity: String,
    pub referral_code: String,
}

impl Default for ModalForm {
    fn default() -> Self {
        Self {
            username: String::new(),
            quantity: "1".to_string(),
            referral_code: String::new(),
        }
    }
}

/// Modal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalState {
    Closed,
    Open {
        product: Product,
        form: ModalForm,
        quote: Quote,
    },
}

/// Why a submission was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    /// No product is bound to the modal.
    Closed,
    /// The Minecraft username field is blank.
    MissingUsername,
}

impl SubmitError {
    /// The notification the page shows, if any.
    #[must_use]
    pub fn notification(self) -> Option<Notification> {
        match self {
            Self::Closed => None,
            Self::MissingUsername => {
                Some(Notification::error("Please enter your Minecraft username"))
            }
        }
    }
}

/// A validated submission waiting for its simulated confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPurchase {
    pub product: Product,
    pub username: String,
    pub referral_code: Option<String>,
    pub quote: Quote,
}

impl PendingPurchase {
    /// Simulated processing time before the purchase is confirmed.
    pub const CONFIRMATION_DELAY: Duration = Duration::from_secs(2);

    /// Shown immediately on submit.
    #[must_use]
    pub fn processing_notice(&self) -> Notification {
        Notification::info("Processing your purchase...")
    }
}

/// The purchase modal.
#[derive(Debug, Clone)]
pub struct PurchaseModal {
    catalog: Catalog,
    state: ModalState,
}

impl PurchaseModal {
    #[must_use]
    pub const fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            state: ModalState::Closed,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &ModalState {
        &self.state
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self.state, ModalState::Open { .. })
    }

    /// The current quote, if a product is bound.
    #[must_use]
    pub const fn quote(&self) -> Option<&Quote> {
        match &self.state {
            ModalState::Open { quote, .. } => Some(quote),
            ModalState::Closed => None,
        }
    }

    /// Bind a product and reset the form.
    ///
    /// # Errors
    ///
    /// Returns [`QuoteError::UnknownProduct`] and leaves the modal as it was
    /// if the catalog has no such product.
    pub fn open(&mut self, product_name: &str) -> Result<(), QuoteError> {
        let product = self
            .catalog
            .get(product_name)
            .cloned()
            .ok_or_else(|| QuoteError::UnknownProduct(product_name.to_string()))?;

        let form = ModalForm::default();
        let quote = Quote::from_input(product.price, &form.quantity, &form.referral_code);
        self.state = ModalState::Open {
            product,
            form,
            quote,
        };
        Ok(())
    }

    /// Unbind the product.
    pub fn close(&mut self) {
        self.state = ModalState::Closed;
    }

    pub fn set_username(&mut self, value: &str) {
        self.edit(|form| form.username = value.to_string());
    }

    pub fn set_quantity(&mut self, value: &str) {
        self.edit(|form| form.quantity = value.to_string());
    }

    pub fn set_referral_code(&mut self, value: &str) {
        self.edit(|form| form.referral_code = value.to_string());
    }

    fn edit(&mut self, apply: impl FnOnce(&mut ModalForm)) {
        if let ModalState::Open {
            product,
            form,
            quote,
        } = &mut self.state
        {
            apply(form);
            *quote = Quote::from_input(product.price, &form.quantity, &form.referral_code);
        }
    }

    /// Validate the form. The modal stays open until [`Self::confirm`].
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::Closed`] when no product is bound and
    /// [`SubmitError::MissingUsername`] when the username is blank.
    pub fn submit(&self) -> Result<PendingPurchase, SubmitError> {
        let ModalState::Open {
            product,
            form,
            quote,
        } = &self.state
        else {
            return Err(SubmitError::Closed);
        };

        let username = form.username.trim();
        if username.is_empty() {
            return Err(SubmitError::MissingUsername);
        }

        let referral_code = Some(form.referral_code.trim())
            .filter(|code| !code.is_empty())
            .map(str::to_string);

        Ok(PendingPurchase {
            product: product.clone(),
            username: username.to_string(),
            referral_code,
            quote: *quote,
        })
    }

    /// Finish a simulated purchase: close the modal and return the success
    /// notification.
    pub fn confirm(&mut self, _pending: PendingPurchase) -> Notification {
        self.close();
        Notification::success("Purchase successful! Check your Discord for delivery details.")
    }
}

impl Default for PurchaseModal {
    fn default() -> Self {
        Self::new(Catalog::default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_closed() {
        let modal = PurchaseModal::default();
        assert!(!modal.is_open());
        assert!(modal.quote().is_none());
    }

    #[test]
    fn test_open_unknown_product_stays_closed() {
        let mut modal = PurchaseModal::default();
        assert_eq!(
            modal.open("Totem of Undying"),
            Err(QuoteError::UnknownProduct("Totem of Undying".to_string()))
        );
        assert_eq!(modal.state(), &ModalState::Closed);
    }

    #[test]
    fn test_open_resets_form() {
        let mut modal = PurchaseModal::default();
        modal.open("Elytra").unwrap();
        modal.set_username("Steve");
        modal.set_quantity("4");
        modal.open("DonutSMP Coins").unwrap();

        let ModalState::Open { product, form, quote } = modal.state() else {
            panic!("modal should be open");
        };
        assert_eq!(product.name, "DonutSMP Coins");
        assert_eq!(form, &ModalForm::default());
        assert_eq!(quote.quantity, 1);
        assert_eq!(quote.total.display_amount(), "0.18");
    }

    #[test]
    fn test_inputs_recompute_quote() {
        let mut modal = PurchaseModal::default();
        modal.open("DonutSMP Coins").unwrap();
        modal.set_quantity("100");
        assert_eq!(modal.quote().unwrap().total.display_amount(), "18.00");

        modal.set_referral_code("FRIEND");
        let quote = modal.quote().unwrap();
        assert_eq!(quote.discount.display_amount(), "1.80");
        assert_eq!(quote.total.display_amount(), "16.20");

        modal.set_referral_code("");
        assert_eq!(modal.quote().unwrap().total.display_amount(), "18.00");
    }

    #[test]
    fn test_edits_while_closed_are_ignored() {
        let mut modal = PurchaseModal::default();
        modal.set_quantity("5");
        assert!(!modal.is_open());
    }

    #[test]
    fn test_submit_requires_username() {
        let mut modal = PurchaseModal::default();
        modal.open("Elytra").unwrap();
        modal.set_username("   ");

        let err = modal.submit().unwrap_err();
        assert_eq!(err, SubmitError::MissingUsername);
        assert_eq!(
            err.notification().unwrap().message,
            "Please enter your Minecraft username"
        );
        assert!(modal.is_open());
    }

    #[test]
    fn test_submit_while_closed() {
        let modal = PurchaseModal::default();
        let err = modal.submit().unwrap_err();
        assert_eq!(err, SubmitError::Closed);
        assert!(err.notification().is_none());
    }

    #[test]
    fn test_submit_and_confirm() {
        let mut modal = PurchaseModal::default();
        modal.open("Netherite Armor").unwrap();
        modal.set_username(" Alex ");
        modal.set_quantity("2");
        modal.set_referral_code(" REF ");

        let pending = modal.submit().unwrap();
        assert_eq!(pending.username, "Alex");
        assert_eq!(pending.referral_code.as_deref(), Some("REF"));
        assert_eq!(pending.quote.total.display_amount(), "35.98");
        assert_eq!(pending.processing_notice().kind, NotificationKind::Info);
        assert!(modal.is_open());

        let done = modal.confirm(pending);
        assert_eq!(done.kind, NotificationKind::Success);
        assert!(!modal.is_open());
    }
}
