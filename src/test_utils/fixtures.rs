use time::{OffsetDateTime, macros::datetime};

use crate::{Email, Transaction, auth::Identity, transaction::TransactionId};

/// The owner of the transactions built by [transaction] and [transaction_in].
pub(crate) const TEST_EMAIL: &str = "foo@bar.baz";

#[track_caller]
pub(crate) fn identity(email: &str) -> Identity {
    let email = Email::new(email).expect("test email should be valid");
    Identity::new(&format!("test:{email}"), email)
}

pub(crate) fn transaction(id: TransactionId, amount: f64, date: OffsetDateTime) -> Transaction {
    Transaction {
        id,
        user_email: TEST_EMAIL.to_owned(),
        amount,
        date,
        description: format!("Transaction {id}"),
        category: None,
    }
}

pub(crate) fn transaction_in(id: TransactionId, amount: f64, category: &str) -> Transaction {
    Transaction {
        category: Some(category.to_owned()),
        ..transaction(id, amount, datetime!(2024-05-01 0:00 UTC))
    }
}

mod fixtures_tests {
    use time::macros::datetime;

    use crate::{
        Email,
        test_utils::fixtures::{TEST_EMAIL, identity, transaction, transaction_in},
    };

    #[test]
    fn identity_has_email() {
        let user = identity("foo@bar.baz");

        assert_eq!(user.email, Some(Email::new("foo@bar.baz").unwrap()));
    }

    #[test]
    fn transactions_belong_to_test_user() {
        let plain = transaction(1, -5.0, datetime!(2024-05-02 0:00 UTC));
        let categorised = transaction_in(2, -5.0, "Food");

        assert_eq!(plain.user_email, TEST_EMAIL);
        assert_eq!(plain.category, None);
        assert_eq!(categorised.user_email, TEST_EMAIL);
        assert_eq!(categorised.category.as_deref(), Some("Food"));
    }
}
