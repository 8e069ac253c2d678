//! Loan workflow tests against an in-memory copy store

mod common;

use std::sync::Arc;

use catalog_server::{
    circulation::{LoanState, RenewalDateError},
    models::{copy::LendCopy, CopyStatus},
    services::loans::LoansService,
    AppError,
};

use common::{day, BarrierCopyStore, MemoryCopyStore};

fn service(store: Arc<MemoryCopyStore>) -> LoansService {
    LoansService::new(store)
}

#[tokio::test]
async fn renew_then_return() {
    let store = Arc::new(MemoryCopyStore::with_users(&[1]));
    let id = store.insert(LoanState::on_loan(1, day(2024, 1, 10))).await;
    let loans = service(store.clone());

    let renewed = loans.renew(id, day(2024, 1, 20), day(2024, 1, 5)).await.unwrap();
    assert_eq!(renewed.status, CopyStatus::OnLoan);
    assert_eq!(renewed.due_back, Some(day(2024, 1, 20)));
    assert_eq!(renewed.borrower_id, Some(1));

    let returned = loans.mark_returned(id).await.unwrap();
    assert_eq!(returned.status, CopyStatus::Available);
    assert_eq!(returned.due_back, None);
    assert_eq!(returned.borrower_id, None);

    let stored = store.snapshot(id).await.unwrap();
    assert_eq!(stored.loan_state(), LoanState::idle(CopyStatus::Available));
}

#[tokio::test]
async fn renewal_window_is_inclusive() {
    let store = Arc::new(MemoryCopyStore::with_users(&[1]));
    let id = store.insert(LoanState::on_loan(1, day(2024, 1, 10))).await;
    let loans = service(store.clone());
    let today = day(2024, 1, 5);

    let same_day = loans.renew(id, today, today).await.unwrap();
    assert_eq!(same_day.due_back, Some(today));

    let furthest = loans.renew(id, day(2024, 2, 2), today).await.unwrap();
    assert_eq!(furthest.due_back, Some(day(2024, 2, 2)));

    let err = loans.renew(id, day(2024, 2, 3), today).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::RenewalDate(RenewalDateError::DateTooFarAhead(d)) if d == day(2024, 2, 3)
    ));
    assert_eq!(store.snapshot(id).await.unwrap().due_back, Some(day(2024, 2, 2)));
}

#[tokio::test]
async fn overdue_copy_can_be_renewed() {
    let store = Arc::new(MemoryCopyStore::with_users(&[3]));
    let id = store.insert(LoanState::on_loan(3, day(2024, 1, 1))).await;
    let loans = service(store);

    let proposal = loans.renewal_proposal(id, day(2024, 1, 15)).await.unwrap();
    assert!(proposal.is_overdue);
    assert_eq!(proposal.proposed_due_back, day(2024, 2, 5));

    let renewed = loans
        .renew(id, proposal.proposed_due_back, day(2024, 1, 15))
        .await
        .unwrap();
    assert_eq!(renewed.due_back, Some(day(2024, 2, 5)));
}

#[tokio::test]
async fn transitions_from_idle_states_are_rejected() {
    let store = Arc::new(MemoryCopyStore::with_users(&[1]));
    let available = store.insert(LoanState::idle(CopyStatus::Available)).await;
    let reserved = store.insert(LoanState::idle(CopyStatus::Reserved)).await;
    let loans = service(store.clone());

    let err = loans.mark_returned(available).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)));

    let err = loans
        .renew(reserved, day(2024, 1, 20), day(2024, 1, 5))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)));

    assert_eq!(
        store.snapshot(reserved).await.unwrap().loan_state(),
        LoanState::idle(CopyStatus::Reserved)
    );
}

#[tokio::test]
async fn lend_return_and_lend_again() {
    let store = Arc::new(MemoryCopyStore::with_users(&[1, 2]));
    let id = store.insert(LoanState::idle(CopyStatus::Available)).await;
    let loans = service(store);
    let today = day(2024, 3, 1);

    let first = LendCopy {
        borrower_id: 1,
        due_back: day(2024, 3, 22),
    };
    let lent = loans.lend(id, &first, today).await.unwrap();
    assert_eq!(lent.loan_state(), LoanState::on_loan(1, day(2024, 3, 22)));

    let err = loans
        .lend(
            id,
            &LendCopy {
                borrower_id: 2,
                due_back: day(2024, 3, 22),
            },
            today,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)));

    loans.mark_returned(id).await.unwrap();
    let again = loans
        .lend(
            id,
            &LendCopy {
                borrower_id: 2,
                due_back: day(2024, 3, 15),
            },
            today,
        )
        .await
        .unwrap();
    assert_eq!(again.borrower_id, Some(2));
}

#[tokio::test]
async fn lend_to_unknown_borrower_is_not_found() {
    let store = Arc::new(MemoryCopyStore::with_users(&[1]));
    let id = store.insert(LoanState::idle(CopyStatus::Available)).await;
    let loans = service(store.clone());

    let request = LendCopy {
        borrower_id: 99,
        due_back: day(2024, 3, 22),
    };
    let err = loans.lend(id, &request, day(2024, 3, 1)).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(store.snapshot(id).await.unwrap().status, CopyStatus::Available);
}

#[tokio::test]
async fn concurrent_renewals_have_one_winner() {
    let memory = Arc::new(MemoryCopyStore::with_users(&[1]));
    let id = memory.insert(LoanState::on_loan(1, day(2024, 1, 10))).await;
    let loans = LoansService::new(Arc::new(BarrierCopyStore::new(memory.clone(), 2)));
    let today = day(2024, 1, 5);

    let (a, b) = tokio::join!(
        loans.renew(id, day(2024, 1, 20), today),
        loans.renew(id, day(2024, 1, 25), today),
    );

    let (winner, loser) = match (a, b) {
        (Ok(copy), Err(err)) | (Err(err), Ok(copy)) => (copy, err),
        (a, b) => panic!("expected exactly one renewal to succeed, got {:?} and {:?}", a, b),
    };
    assert!(matches!(loser, AppError::Conflict(_)));

    let stored = memory.snapshot(id).await.unwrap();
    assert_eq!(stored.due_back, winner.due_back);
    assert_eq!(stored.borrower_id, Some(1));
}

#[tokio::test]
async fn concurrent_return_and_renew_have_one_winner() {
    let memory = Arc::new(MemoryCopyStore::with_users(&[1]));
    let id = memory.insert(LoanState::on_loan(1, day(2024, 1, 10))).await;
    let loans = LoansService::new(Arc::new(BarrierCopyStore::new(memory.clone(), 2)));

    let (returned, renewed) = tokio::join!(
        loans.mark_returned(id),
        loans.renew(id, day(2024, 1, 20), day(2024, 1, 5)),
    );
    assert!(returned.is_ok() != renewed.is_ok());

    let stored = memory.snapshot(id).await.unwrap();
    stored.loan_state().check_consistent().unwrap();
}
