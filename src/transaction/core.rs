//! Defines the core data models for transactions.

use time::{
    Date, OffsetDateTime, PrimitiveDateTime, UtcOffset, format_description::well_known::Rfc3339,
    macros::format_description,
};

use crate::Error;

/// Alias for the integer type used for transaction IDs.
pub type TransactionId = i64;

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new transaction, use [Transaction::build] and pass the result
/// to [TransactionGateway::add](crate::TransactionGateway::add), which gets
/// the ID from the data service.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID assigned by the data service.
    pub id: TransactionId,
    /// The email of the user that owns the transaction.
    pub user_email: String,
    /// The amount of money spent or earned in this transaction.
    ///
    /// Positive values are income, negative values are expenses.
    pub amount: f64,
    /// When the transaction happened, as declared by the user.
    pub date: OffsetDateTime,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The category of the transaction, e.g. "Groceries", "Transport", "Rent".
    pub category: Option<String>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [NewTransaction] for discoverability.
    pub fn build(amount: f64, date: OffsetDateTime, description: &str) -> NewTransaction {
        NewTransaction {
            amount,
            date,
            description: description.to_owned(),
            category: None,
        }
    }

    /// Whether the transaction is money earned.
    pub fn is_income(&self) -> bool {
        self.amount > 0.0
    }

    /// Whether the transaction is money spent.
    pub fn is_expense(&self) -> bool {
        self.amount < 0.0
    }
}

/// A transaction that has not been saved yet.
///
/// It has no ID and no owner: the data service assigns the ID and the
/// gateway attaches the signed-in user's email.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The monetary amount of the transaction.
    ///
    /// # Examples
    /// - `150.00` - Salary deposit
    /// - `-45.99` - Coffee shop purchase
    pub amount: f64,
    /// When the transaction happened.
    pub date: OffsetDateTime,
    /// A human-readable description of the transaction.
    pub description: String,
    /// The category of the transaction, if any.
    pub category: Option<String>,
}

impl NewTransaction {
    /// Set the category for the transaction.
    pub fn category(mut self, category: Option<&str>) -> Self {
        self.category = category.map(str::to_owned);
        self
    }
}

/// A transaction identifier as it arrives from the user interface.
///
/// Lists hand back IDs as numbers or as text, so the ID is only checked
/// when it is about to be used.
#[derive(Debug, Clone, PartialEq)]
pub enum RawTransactionId {
    /// An integer ID.
    Integer(i64),
    /// A floating point ID, valid only if it has no fractional part.
    Float(f64),
    /// An ID in text form, e.g. from a form field.
    Text(String),
}

impl RawTransactionId {
    /// Convert the raw ID into a [TransactionId].
    ///
    /// # Errors
    /// Returns [Error::InvalidId] if the ID is not a whole number.
    pub fn parse(&self) -> Result<TransactionId, Error> {
        let parsed = match self {
            RawTransactionId::Integer(id) => Some(*id),
            RawTransactionId::Float(id) => float_to_id(*id),
            RawTransactionId::Text(text) => {
                let text = text.trim();
                text.parse::<i64>()
                    .ok()
                    .or_else(|| text.parse::<f64>().ok().and_then(float_to_id))
            }
        };

        parsed.ok_or_else(|| Error::InvalidId(self.to_string()))
    }
}

pub(crate) fn float_to_id(id: f64) -> Option<TransactionId> {
    if id.is_finite() && id.fract() == 0.0 && id.abs() < i64::MAX as f64 {
        Some(id as i64)
    } else {
        None
    }
}

impl std::fmt::Display for RawTransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawTransactionId::Integer(id) => write!(f, "{id}"),
            RawTransactionId::Float(id) => write!(f, "{id}"),
            RawTransactionId::Text(text) => write!(f, "{text}"),
        }
    }
}

impl From<i64> for RawTransactionId {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for RawTransactionId {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for RawTransactionId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for RawTransactionId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

// ============================================================================
// TIMESTAMPS
// ============================================================================

/// Format `date` the way it is sent to the data service: RFC 3339 in UTC,
/// truncated to milliseconds.
///
/// # Errors
/// Returns [Error::InvalidDate] if the date cannot be represented.
pub(crate) fn format_timestamp(date: OffsetDateTime) -> Result<String, Error> {
    let utc = date.to_offset(UtcOffset::UTC);
    let truncated = utc
        .replace_nanosecond(utc.millisecond() as u32 * 1_000_000)
        .map_err(|error| Error::InvalidDate(error.to_string()))?;

    truncated
        .format(&Rfc3339)
        .map_err(|error| Error::InvalidDate(error.to_string()))
}

/// Parse a timestamp from the data service or the user.
///
/// Accepts RFC 3339 date-times, date-times without an offset such as
/// `2024-05-01T12:00:00`, and plain `YYYY-MM-DD` dates. Timestamps without
/// an offset are read as UTC, dates as midnight UTC.
///
/// # Errors
/// Returns [Error::InvalidDate] if `text` is none of these.
pub fn parse_timestamp(text: &str) -> Result<OffsetDateTime, Error> {
    let text = text.trim();

    if let Ok(date_time) = OffsetDateTime::parse(text, &Rfc3339) {
        return Ok(date_time);
    }

    let without_offset =
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]");
    if let Ok(date_time) = PrimitiveDateTime::parse(text, without_offset) {
        return Ok(date_time.assume_utc());
    }

    Date::parse(text, format_description!("[year]-[month]-[day]"))
        .map(|date| date.midnight().assume_utc())
        .map_err(|error| Error::InvalidDate(format!("\"{text}\": {error}")))
}

/// Convert milliseconds since the Unix epoch into a timestamp.
pub(crate) fn timestamp_from_millis(millis: i64) -> Option<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(millis as i128 * 1_000_000).ok()
}

#[cfg(test)]
mod core_tests {
    use time::macros::datetime;

    use crate::{
        Error, RawTransactionId, Transaction,
        transaction::core::{format_timestamp, parse_timestamp, timestamp_from_millis},
    };

    #[test]
    fn build_creates_new_transaction_without_category() {
        let new_transaction =
            Transaction::build(-45.99, datetime!(2025-01-15 10:30 UTC), "Coffee");

        assert_eq!(new_transaction.amount, -45.99);
        assert_eq!(new_transaction.description, "Coffee");
        assert_eq!(new_transaction.category, None);
    }

    #[test]
    fn category_sets_category() {
        let new_transaction = Transaction::build(-10.0, datetime!(2025-01-15 10:30 UTC), "Bus")
            .category(Some("Transport"));

        assert_eq!(new_transaction.category.as_deref(), Some("Transport"));
    }

    #[test]
    fn raw_id_parses_numbers_and_numeric_text() {
        assert_eq!(RawTransactionId::from(3_i64).parse(), Ok(3));
        assert_eq!(RawTransactionId::from(3.0).parse(), Ok(3));
        assert_eq!(RawTransactionId::from(" 42 ").parse(), Ok(42));
        assert_eq!(RawTransactionId::from("7.0").parse(), Ok(7));
    }

    #[test]
    fn raw_id_rejects_non_numeric_values() {
        for raw in [
            RawTransactionId::from("abc"),
            RawTransactionId::from(""),
            RawTransactionId::from(1.5),
            RawTransactionId::from(f64::NAN),
        ] {
            assert!(
                matches!(raw.parse(), Err(Error::InvalidId(_))),
                "want InvalidId for {raw:?}"
            );
        }
    }

    #[test]
    fn format_timestamp_uses_utc() {
        let formatted = format_timestamp(datetime!(2024-05-01 14:00 +02:00)).unwrap();

        assert_eq!(formatted, "2024-05-01T12:00:00Z");
    }

    #[test]
    fn parse_timestamp_round_trips_formatted_timestamp() {
        let date = datetime!(2024-05-01 12:00:00.250 UTC);

        let parsed = parse_timestamp(&format_timestamp(date).unwrap()).unwrap();

        assert_eq!(parsed, date);
    }

    #[test]
    fn parse_timestamp_accepts_plain_dates() {
        let parsed = parse_timestamp("2024-05-01").unwrap();

        assert_eq!(parsed, datetime!(2024-05-01 0:00 UTC));
    }

    #[test]
    fn parse_timestamp_reads_date_time_without_offset_as_utc() {
        assert_eq!(
            parse_timestamp("2024-05-01T12:00:00").unwrap(),
            datetime!(2024-05-01 12:00 UTC)
        );
        assert_eq!(
            parse_timestamp("2024-05-01T12:00:00.250").unwrap(),
            datetime!(2024-05-01 12:00:00.250 UTC)
        );
    }

    #[test]
    fn parse_timestamp_rejects_garbage() {
        assert!(matches!(
            parse_timestamp("yesterday"),
            Err(Error::InvalidDate(_))
        ));
    }

    #[test]
    fn timestamp_from_millis_converts_epoch_milliseconds() {
        let date = timestamp_from_millis(1_714_564_800_000).unwrap();

        assert_eq!(date, datetime!(2024-05-01 12:00 UTC));
    }
}
