//! Turns add and delete intents into calls to the transaction data service.

use std::sync::Arc;

use serde_json::Value;

use crate::{
    Error,
    auth::Identity,
    transaction::{
        core::{NewTransaction, RawTransactionId, Transaction, TransactionId, format_timestamp},
        remote::{
            CreateResponse, DeleteResponse, NewTransactionPayload, TransactionService,
            list_records, parse_created_record,
        },
    },
};

/// The boundary between the application and the [TransactionService].
///
/// Checks preconditions before calling the service and classifies every
/// response as success, rejection or malformed. It never touches the local
/// store; callers patch the store once an operation has succeeded.
#[derive(Clone)]
pub struct TransactionGateway {
    service: Arc<dyn TransactionService>,
}

impl TransactionGateway {
    /// Create a gateway for `service`.
    pub fn new(service: Arc<dyn TransactionService>) -> Self {
        Self { service }
    }

    /// Fetch every record the service returns.
    ///
    /// The records are not filtered or validated.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::Transport] if the call fails,
    /// - or [Error::DataFormat] if the response is not a list.
    pub async fn list(&self) -> Result<Vec<Value>, Error> {
        let response = self.service.list().await.map_err(into_transport)?;

        list_records(response)
    }

    /// Save `transaction` for `user` and return it with its new ID.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::Unauthenticated] if there is no user or the user has no email,
    /// - [Error::InvalidAmount] if the amount is NaN or infinite,
    /// - [Error::RemoteRejection] if the service refused the transaction,
    /// - [Error::RemoteMalformed] if the response could not be understood,
    /// - or [Error::Transport] if the call fails.
    ///
    /// No call is made for the first two.
    pub async fn add(
        &self,
        user: Option<&Identity>,
        transaction: NewTransaction,
    ) -> Result<Transaction, Error> {
        let email = owner_email(user)?;

        if !transaction.amount.is_finite() {
            return Err(Error::InvalidAmount(transaction.amount));
        }

        let payload = NewTransactionPayload {
            amount: transaction.amount,
            date: format_timestamp(transaction.date)?,
            user_email: email.to_owned(),
            description: transaction.description,
            category: transaction.category,
        };

        let response = self
            .service
            .create(payload.clone())
            .await
            .map_err(into_transport)?;

        match CreateResponse::classify(response) {
            CreateResponse::Created(record) => {
                parse_created_record(record, &payload).map_err(|error| {
                    tracing::error!("Could not read the created transaction: {error}");
                    Error::RemoteMalformed
                })
            }
            CreateResponse::Rejected(detail) => Err(Error::RemoteRejection(detail)),
            CreateResponse::Malformed(response) => {
                tracing::error!("Unexpected response to create transaction: {response}");
                Err(Error::RemoteMalformed)
            }
        }
    }

    /// Delete the transaction `id` owned by `user` and return its ID.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::Unauthenticated] if there is no user or the user has no email,
    /// - [Error::InvalidId] if `id` is not a whole number,
    /// - [Error::RemoteRejection] if the service refused to delete it,
    /// - [Error::RemoteMalformed] if the response could not be understood,
    /// - or [Error::Transport] if the call fails.
    ///
    /// No call is made for the first two.
    pub async fn delete(
        &self,
        user: Option<&Identity>,
        id: RawTransactionId,
    ) -> Result<TransactionId, Error> {
        let email = owner_email(user)?;
        let id = id.parse()?;

        let response = self
            .service
            .delete(id, email)
            .await
            .map_err(into_transport)?;

        match DeleteResponse::classify(response) {
            DeleteResponse::Deleted => Ok(id),
            DeleteResponse::Rejected(detail) => Err(Error::RemoteRejection(detail)),
            DeleteResponse::Malformed(response) => {
                tracing::error!("Unexpected response to delete transaction {id}: {response}");
                Err(Error::RemoteMalformed)
            }
        }
    }
}

fn owner_email(user: Option<&Identity>) -> Result<&str, Error> {
    user.and_then(|user| user.email.as_ref())
        .map(|email| email.as_str())
        .ok_or(Error::Unauthenticated)
}

fn into_transport(error: Error) -> Error {
    match error {
        Error::Transport(_) => error,
        other => Error::Transport(other.to_string()),
    }
}

#[cfg(test)]
mod gateway_tests {
    use std::sync::Arc;

    use serde_json::json;
    use time::macros::datetime;

    use crate::{
        Error, Transaction, TransactionGateway,
        auth::Identity,
        test_utils::{FakeTransactionService, ServiceCall, identity},
    };

    fn gateway(service: &Arc<FakeTransactionService>) -> TransactionGateway {
        TransactionGateway::new(service.clone())
    }

    #[tokio::test]
    async fn add_sends_payload_with_owner_and_returns_created_transaction() {
        let service = FakeTransactionService::with_responses([Ok(json!({
            "id": 3,
            "userEmail": "foo@bar.baz",
            "amount": "-30",
            "date": "2024-05-03T00:00:00Z",
            "description": "Lunch",
        }))]);
        let user = identity("foo@bar.baz");

        let transaction = gateway(&service)
            .add(
                Some(&user),
                Transaction::build(-30.0, datetime!(2024-05-03 0:00 UTC), "Lunch"),
            )
            .await
            .unwrap();

        assert_eq!(transaction.id, 3);
        assert_eq!(transaction.amount, -30.0);
        assert_eq!(transaction.date, datetime!(2024-05-03 0:00 UTC));
        let calls = service.calls();
        let [ServiceCall::Create(payload)] = calls.as_slice() else {
            panic!("want one create call, got {calls:?}");
        };
        assert_eq!(payload.user_email, "foo@bar.baz");
        assert_eq!(payload.date, "2024-05-03T00:00:00Z");
    }

    #[tokio::test]
    async fn add_without_user_makes_no_call() {
        let service = FakeTransactionService::with_responses([]);

        let result = gateway(&service)
            .add(
                None,
                Transaction::build(1.0, datetime!(2024-05-03 0:00 UTC), ""),
            )
            .await;

        assert_eq!(result, Err(Error::Unauthenticated));
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn add_for_user_without_email_makes_no_call() {
        let service = FakeTransactionService::with_responses([]);
        let user = Identity {
            uid: "anonymous".to_owned(),
            email: None,
        };

        let result = gateway(&service)
            .add(
                Some(&user),
                Transaction::build(1.0, datetime!(2024-05-03 0:00 UTC), ""),
            )
            .await;

        assert_eq!(result, Err(Error::Unauthenticated));
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn add_rejects_nan_amount() {
        let service = FakeTransactionService::with_responses([]);
        let user = identity("foo@bar.baz");

        let result = gateway(&service)
            .add(
                Some(&user),
                Transaction::build(f64::NAN, datetime!(2024-05-03 0:00 UTC), ""),
            )
            .await;

        assert!(matches!(result, Err(Error::InvalidAmount(_))));
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn add_classifies_rejection_malformed_and_transport_errors() {
        let service = FakeTransactionService::with_responses([
            Ok(json!({"error": "quota exceeded"})),
            Ok(json!("ok")),
            Ok(json!({"id": "not a number"})),
            Err(Error::Transport("connection reset".to_owned())),
        ]);
        let user = identity("foo@bar.baz");
        let gateway = gateway(&service);
        let new_transaction = Transaction::build(1.0, datetime!(2024-05-03 0:00 UTC), "");

        let mut results = Vec::new();
        for _ in 0..4 {
            results.push(gateway.add(Some(&user), new_transaction.clone()).await);
        }

        assert_eq!(
            results,
            vec![
                Err(Error::RemoteRejection("quota exceeded".to_owned())),
                Err(Error::RemoteMalformed),
                Err(Error::RemoteMalformed),
                Err(Error::Transport("connection reset".to_owned())),
            ]
        );
    }

    #[tokio::test]
    async fn delete_coerces_text_id_and_scopes_by_owner() {
        let service = FakeTransactionService::with_responses([Ok(json!({"success": true}))]);
        let user = identity("foo@bar.baz");

        let id = gateway(&service)
            .delete(Some(&user), "2".into())
            .await
            .unwrap();

        assert_eq!(id, 2);
        assert_eq!(
            service.calls(),
            vec![ServiceCall::Delete(2, "foo@bar.baz".to_owned())]
        );
    }

    #[tokio::test]
    async fn delete_with_non_numeric_id_makes_no_call() {
        let service = FakeTransactionService::with_responses([]);
        let user = identity("foo@bar.baz");

        let result = gateway(&service).delete(Some(&user), "abc".into()).await;

        assert_eq!(result, Err(Error::InvalidId("abc".to_owned())));
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn delete_without_user_makes_no_call() {
        let service = FakeTransactionService::with_responses([]);

        let result = gateway(&service).delete(None, 1_i64.into()).await;

        assert_eq!(result, Err(Error::Unauthenticated));
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn delete_classifies_rejection_and_malformed_responses() {
        let service = FakeTransactionService::with_responses([
            Ok(json!({"success": false, "error": "not found"})),
            Ok(json!({"deleted": 1})),
        ]);
        let user = identity("foo@bar.baz");
        let gateway = gateway(&service);

        let rejected = gateway.delete(Some(&user), 2_i64.into()).await;
        let malformed = gateway.delete(Some(&user), 2_i64.into()).await;

        assert_eq!(rejected, Err(Error::RemoteRejection("not found".to_owned())));
        assert_eq!(malformed, Err(Error::RemoteMalformed));
    }

    #[tokio::test]
    async fn list_wraps_service_errors_as_transport_errors() {
        let service =
            FakeTransactionService::with_responses([Err(Error::InvalidRecord("boom".to_owned()))]);

        let result = gateway(&service).list().await;

        assert!(matches!(result, Err(Error::Transport(_))));
    }
}
