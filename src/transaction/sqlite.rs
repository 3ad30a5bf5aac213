//! Implements a SQLite backed transaction data service.
//!
//! It answers in the same loosely typed JSON shapes as the hosted data
//! service, so the CLI can run against a local database file.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::{Connection, Row};
use serde_json::{Value, json};

use crate::{
    Error,
    email::Email,
    transaction::{
        core::{TransactionId, parse_timestamp},
        remote::{NewTransactionPayload, TransactionService},
    },
};

/// Stores transactions for all users in a SQLite database.
///
/// Like the hosted service, [TransactionService::list] returns every user's
/// transactions; only deletes are scoped to the owner.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionService {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionService {
    /// Create a new service for the SQLite `connection`.
    ///
    /// The transaction table must exist, see [crate::initialize_db].
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)
    }

    fn list_records(&self) -> Result<Value, Error> {
        let connection = self.lock()?;

        let records = connection
            .prepare(
                "SELECT id, user_email, amount, date, description, category
                 FROM \"transaction\" ORDER BY id",
            )?
            .query_map([], map_record_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Value::Array(records))
    }

    fn create_record(&self, payload: NewTransactionPayload) -> Result<Value, Error> {
        if let Err(error) = Email::new(&payload.user_email) {
            return Ok(json!({ "error": error.to_string() }));
        }

        if !payload.amount.is_finite() {
            return Ok(json!({ "error": format!("{} is not a valid amount", payload.amount) }));
        }

        if let Err(error) = parse_timestamp(&payload.date) {
            return Ok(json!({ "error": error.to_string() }));
        }

        let connection = self.lock()?;

        let record = connection
            .prepare(
                "INSERT INTO \"transaction\" (user_email, amount, date, description, category)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 RETURNING id, user_email, amount, date, description, category",
            )?
            .query_row(
                (
                    payload.user_email,
                    payload.amount,
                    payload.date,
                    payload.description,
                    payload.category,
                ),
                map_record_row,
            )?;

        Ok(record)
    }

    fn delete_record(&self, id: TransactionId, owner_email: &str) -> Result<Value, Error> {
        let connection = self.lock()?;

        let rows_affected = connection.execute(
            "DELETE FROM \"transaction\" WHERE id = ?1 AND user_email = ?2",
            (id, owner_email),
        )?;

        if rows_affected == 0 {
            Ok(json!({ "success": false, "error": "not found" }))
        } else {
            Ok(json!({ "success": true }))
        }
    }
}

#[async_trait]
impl TransactionService for SQLiteTransactionService {
    async fn list(&self) -> Result<Value, Error> {
        self.list_records()
    }

    async fn create(&self, payload: NewTransactionPayload) -> Result<Value, Error> {
        self.create_record(payload)
    }

    async fn delete(&self, id: TransactionId, owner_email: &str) -> Result<Value, Error> {
        self.delete_record(id, owner_email)
    }
}

fn map_record_row(row: &Row) -> Result<Value, rusqlite::Error> {
    let id: TransactionId = row.get(0)?;
    let user_email: String = row.get(1)?;
    let amount: f64 = row.get(2)?;
    let date: String = row.get(3)?;
    let description: String = row.get(4)?;
    let category: Option<String> = row.get(5)?;

    Ok(json!({
        "id": id,
        "userEmail": user_email,
        "amount": amount,
        "date": date,
        "description": description,
        "category": category,
    }))
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_email TEXT NOT NULL,
                amount REAL NOT NULL,
                date TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                category TEXT
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_email ON \"transaction\"(user_email)",
        (),
    )?;

    Ok(())
}
