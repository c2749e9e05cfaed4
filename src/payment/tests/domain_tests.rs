//! Unit tests for payment domain types.

use crate::identity::domain::UserId;
use crate::payment::domain::{Payment, PaymentDomainError, PaymentStatus};
use crate::task::domain::{Task, TaskDetails};
use chrono::{Duration, Utc};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[fixture]
fn open_task() -> Task {
    let details = TaskDetails::new(
        "Ledger export",
        "Port the exporter",
        450.0,
        Some(Utc::now() + Duration::days(14)),
        None,
        Vec::new(),
    )
    .expect("valid details");
    Task::post(UserId::new(), details, &DefaultClock)
}

#[fixture]
fn assigned_task(mut open_task: Task) -> Task {
    open_task
        .assign_and_start(UserId::new(), &DefaultClock)
        .expect("open task accepts an assignee");
    open_task
}

#[rstest]
fn unassigned_task_cannot_be_paid(open_task: Task) {
    let result = Payment::record(&open_task, 100.0, "card", None, &DefaultClock);

    assert_eq!(result, Err(PaymentDomainError::Unassigned(open_task.id())));
}

#[rstest]
fn payment_snapshots_task_parties(assigned_task: Task) {
    let payment = Payment::record(&assigned_task, 100.0, " card ", Some("stripe".to_owned()), &DefaultClock)
        .expect("assigned task can be paid");

    assert_eq!(payment.client_id(), assigned_task.client_id());
    assert_eq!(Some(payment.freelancer_id()), assigned_task.freelancer_id());
    assert_eq!(payment.status(), PaymentStatus::Pending);
    assert_eq!(payment.payment_method(), "card");
    assert_eq!(payment.payment_gateway(), Some("stripe"));
    assert_eq!(payment.transaction_id(), None);
}

#[rstest]
#[case(0.0, "card")]
#[case(-20.0, "card")]
#[case(100.0, "  ")]
fn invalid_fields_are_rejected(assigned_task: Task, #[case] amount: f64, #[case] method: &str) {
    let result = Payment::record(&assigned_task, amount, method, None, &DefaultClock);

    assert!(result.is_err());
}

#[rstest]
fn settle_overwrites_reference_only_when_given(assigned_task: Task) {
    let mut payment =
        Payment::record(&assigned_task, 100.0, "card", None, &DefaultClock).expect("valid payment");

    payment.settle(PaymentStatus::Completed, Some("txn-1".to_owned()), &DefaultClock);
    payment.settle(PaymentStatus::Refunded, Some("   ".to_owned()), &DefaultClock);

    assert_eq!(payment.status(), PaymentStatus::Refunded);
    assert_eq!(payment.transaction_id(), Some("txn-1"));

    payment.settle(PaymentStatus::Refunded, Some("txn-2".to_owned()), &DefaultClock);
    assert_eq!(payment.transaction_id(), Some("txn-2"));
}

#[rstest]
#[case("pending", PaymentStatus::Pending)]
#[case("completed", PaymentStatus::Completed)]
#[case("Failed", PaymentStatus::Failed)]
#[case("refunded", PaymentStatus::Refunded)]
fn status_parses_known_values(#[case] raw: &str, #[case] expected: PaymentStatus) {
    assert_eq!(PaymentStatus::try_from(raw), Ok(expected));
}

#[rstest]
fn status_rejects_unknown_value() {
    assert!(PaymentStatus::try_from("settled").is_err());
}
