//! Purchase tickets handed to the Discord bot.
//!
//! A [`TicketSubmission`] is what the browser posts: every field optional and
//! loosely typed. [`TicketSubmission::into_ticket`] applies the presence rule
//! (absent, `null`, `false`, `0` and `""` all count as missing). That is the
//! only check; the values are relayed exactly as submitted.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{TransactionId, TransactionIdError};

/// Ticket validation errors.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TicketError {
    /// One or more of the five required fields is missing.
    #[error("Missing required fields")]
    MissingFields(Vec<&'static str>),
}

/// A purchase ticket with all five fields present.
///
/// Field values are kept as the client sent them, so a ticket serializes
/// back to the submitted JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// Minecraft username of the buyer.
    pub buyer: Value,
    /// Discord handle to open the ticket for.
    pub discord: Value,
    pub transaction_id: Value,
    pub total_amount: Value,
    /// Normally `[{"name": ..., "amount": ...}]`.
    pub items: Value,
}

impl Ticket {
    /// Fixed ticket used to check the companion bot end to end.
    ///
    /// The transaction id is `TEST_<millis>` so repeated runs don't collide.
    #[must_use]
    pub fn sample(unix_millis: i64) -> Self {
        Self {
            buyer: json!("TestUser"),
            discord: json!("TestUser#1234"),
            transaction_id: json!(format!("TEST_{unix_millis}")),
            total_amount: json!("25.00"),
            items: json!([
                { "name": "DonutSMP Money", "amount": "200M" },
                { "name": "Test Item", "amount": "1x" },
            ]),
        }
    }

    /// The transaction id as text, for logs and file names.
    #[must_use]
    pub fn transaction_label(&self) -> String {
        value_text(&self.transaction_id)
    }

    /// The transaction id as a safe file name component.
    ///
    /// # Errors
    ///
    /// Returns an error if the id could escape or break a ticket directory.
    pub fn file_id(&self) -> Result<TransactionId, TransactionIdError> {
        TransactionId::parse(&self.transaction_label())
    }

    /// Number of purchased items; a non-list `items` counts as one.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.as_array().map_or(1, Vec::len)
    }
}

/// Strings as-is, any other JSON value in its JSON form.
#[must_use]
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Raw `POST /api/create-ticket` body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketSubmission {
    #[serde(default)]
    pub buyer: Option<Value>,
    #[serde(default)]
    pub discord: Option<Value>,
    #[serde(default)]
    pub transaction_id: Option<Value>,
    #[serde(default)]
    pub total_amount: Option<Value>,
    #[serde(default)]
    pub items: Option<Value>,
}

impl TicketSubmission {
    /// Names of required fields that are missing, in declaration order.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("buyer", &self.buyer),
            ("discord", &self.discord),
            ("transactionId", &self.transaction_id),
            ("totalAmount", &self.total_amount),
            ("items", &self.items),
        ]
        .into_iter()
        .filter(|(_, value)| !value.as_ref().is_some_and(is_truthy))
        .map(|(name, _)| name)
        .collect()
    }

    /// Turn the submission into a [`Ticket`] once every field is present.
    ///
    /// # Errors
    ///
    /// Returns [`TicketError::MissingFields`] when any required field is
    /// missing.
    pub fn into_ticket(self) -> Result<Ticket, TicketError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(TicketError::MissingFields(missing));
        }

        Ok(Ticket {
            buyer: self.buyer.unwrap_or_default(),
            discord: self.discord.unwrap_or_default(),
            transaction_id: self.transaction_id.unwrap_or_default(),
            total_amount: self.total_amount.unwrap_or_default(),
            items: self.items.unwrap_or_default(),
        })
    }
}

/// JavaScript truthiness, the rule the storefront has always used for
/// "field present".
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
