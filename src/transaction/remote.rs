//! The transaction data service and the shapes of its payloads.
//!
//! The service speaks loosely typed JSON. Everything coming back is
//! validated and coerced here, once, so the rest of the crate only sees
//! [Transaction]s.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    Error,
    transaction::core::{
        Transaction, TransactionId, float_to_id, parse_timestamp, timestamp_from_millis,
    },
};

/// The external service that stores transactions.
///
/// Implementations return `Err` only when the call itself fails, e.g. a
/// network error. Refusals are reported in the response body.
#[async_trait]
pub trait TransactionService: Send + Sync {
    /// List transaction records.
    ///
    /// A well-behaved service responds with an array of objects with the
    /// fields `id`, `userEmail`, `amount`, `date`, `description` and
    /// `category`. The amount and date may be numbers or strings.
    async fn list(&self) -> Result<Value, Error>;

    /// Create a transaction.
    ///
    /// Responds with the stored record, which includes its new `id`, or
    /// with `{"error": "..."}`.
    async fn create(&self, payload: NewTransactionPayload) -> Result<Value, Error>;

    /// Delete the transaction `id` owned by `owner_email`.
    ///
    /// Responds with `{"success": true}` or
    /// `{"success": false, "error": "..."}`.
    async fn delete(&self, id: TransactionId, owner_email: &str) -> Result<Value, Error>;
}

/// The body of a create request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransactionPayload {
    /// The signed amount.
    pub amount: f64,
    /// The date in RFC 3339 form.
    pub date: String,
    /// The owner's email address.
    pub user_email: String,
    /// A text description of the transaction.
    pub description: String,
    /// The category of the transaction, if any.
    pub category: Option<String>,
}

// ============================================================================
// RESPONSES
// ============================================================================

/// Split a list response into its records.
///
/// # Errors
/// Returns [Error::DataFormat] if `response` is not an array.
pub(crate) fn list_records(response: Value) -> Result<Vec<Value>, Error> {
    match response {
        Value::Array(records) => Ok(records),
        other => {
            tracing::warn!("Transaction list is not an array: {other}");
            Err(Error::DataFormat)
        }
    }
}

/// The owner email of a raw record, if it has one.
pub(crate) fn record_owner(record: &Value) -> Option<&str> {
    record.get("userEmail").and_then(Value::as_str)
}

/// The outcome of a create request.
#[derive(Debug, PartialEq)]
pub(crate) enum CreateResponse {
    /// The stored record.
    Created(Map<String, Value>),
    /// The error detail from the service.
    Rejected(String),
    /// Anything else.
    Malformed(Value),
}

impl CreateResponse {
    pub(crate) fn classify(response: Value) -> Self {
        match response {
            Value::Object(record) if record.contains_key("id") => Self::Created(record),
            Value::Object(record) if record.contains_key("error") => {
                Self::Rejected(error_detail(&record["error"]))
            }
            other => Self::Malformed(other),
        }
    }
}

/// The outcome of a delete request.
#[derive(Debug, PartialEq)]
pub(crate) enum DeleteResponse {
    Deleted,
    Rejected(String),
    Malformed(Value),
}

impl DeleteResponse {
    pub(crate) fn classify(response: Value) -> Self {
        if response.get("success") == Some(&Value::Bool(true)) {
            return Self::Deleted;
        }

        match response.get("error") {
            Some(error) if is_present(error) => Self::Rejected(error_detail(error)),
            _ => Self::Malformed(response),
        }
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(text) => !text.is_empty(),
        _ => true,
    }
}

fn error_detail(error: &Value) -> String {
    match error {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

// ============================================================================
// RECORDS
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteRecord {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    user_email: Option<String>,
    #[serde(default)]
    amount: Value,
    #[serde(default)]
    date: Value,
    #[serde(default)]
    description: Value,
    #[serde(default)]
    category: Value,
}

/// Validate a raw record and coerce its fields into a [Transaction].
///
/// # Errors
/// Returns [Error::InvalidRecord] naming the first field that is missing or
/// cannot be coerced.
pub(crate) fn parse_record(record: Value) -> Result<Transaction, Error> {
    let record: RemoteRecord =
        serde_json::from_value(record).map_err(|error| Error::InvalidRecord(error.to_string()))?;

    let id = coerce_id(&record.id)
        .ok_or_else(|| Error::InvalidRecord(format!("invalid id {}", record.id)))?;
    let user_email = record
        .user_email
        .ok_or_else(|| Error::InvalidRecord(format!("record {id} has no owner")))?;
    let amount = coerce_number(&record.amount).ok_or_else(|| {
        Error::InvalidRecord(format!("record {id} has invalid amount {}", record.amount))
    })?;
    let date = coerce_timestamp(&record.date).ok_or_else(|| {
        Error::InvalidRecord(format!("record {id} has invalid date {}", record.date))
    })?;

    Ok(Transaction {
        id,
        user_email,
        amount,
        date,
        description: coerce_text(&record.description).unwrap_or_default(),
        category: coerce_text(&record.category).filter(|category| !category.trim().is_empty()),
    })
}

/// Read the record returned by a create request.
///
/// Fields the service left out are filled in from `payload`.
///
/// # Errors
/// Returns [Error::InvalidRecord] if the record is invalid or belongs to
/// someone other than the payload's owner.
pub(crate) fn parse_created_record(
    mut record: Map<String, Value>,
    payload: &NewTransactionPayload,
) -> Result<Transaction, Error> {
    record
        .entry("userEmail")
        .or_insert_with(|| Value::String(payload.user_email.clone()));
    record
        .entry("amount")
        .or_insert_with(|| Value::from(payload.amount));
    record
        .entry("date")
        .or_insert_with(|| Value::String(payload.date.clone()));
    record
        .entry("description")
        .or_insert_with(|| Value::String(payload.description.clone()));
    if let Some(category) = &payload.category {
        record
            .entry("category")
            .or_insert_with(|| Value::String(category.clone()));
    }

    let transaction = parse_record(Value::Object(record))?;

    if transaction.user_email != payload.user_email {
        return Err(Error::InvalidRecord(format!(
            "record {} belongs to {}",
            transaction.id, transaction.user_email
        )));
    }

    Ok(transaction)
}

fn coerce_id(value: &Value) -> Option<TransactionId> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().and_then(float_to_id)),
        Value::String(text) => {
            let text = text.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().and_then(float_to_id))
        }
        _ => None,
    }
}

fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;

    number.is_finite().then_some(number)
}

/// Dates are strings or milliseconds since the Unix epoch. Fractional
/// milliseconds are truncated.
fn coerce_timestamp(value: &Value) -> Option<time::OffsetDateTime> {
    match value {
        Value::String(text) => parse_timestamp(text).ok(),
        Value::Number(number) => number
            .as_i64()
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|millis| millis.is_finite() && millis.abs() < i64::MAX as f64)
                    .map(|millis| millis.trunc() as i64)
            })
            .and_then(timestamp_from_millis),
        _ => None,
    }
}

/// Display-only text fields take any scalar; `null` means absent.
fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}
