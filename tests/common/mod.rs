//! Shared fixtures for the circulation tests

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::{Barrier, Mutex};
use uuid::Uuid;

use catalog_server::{
    circulation::LoanState,
    models::{BookCopy, CopyStatus},
    repository::CopyStore,
    AppError, AppResult,
};

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Copy store kept in memory, with the same compare-and-set rule as the database
#[derive(Default)]
pub struct MemoryCopyStore {
    copies: Mutex<HashMap<Uuid, BookCopy>>,
    users: HashSet<i32>,
}

impl MemoryCopyStore {
    pub fn with_users(users: &[i32]) -> Self {
        Self {
            copies: Mutex::new(HashMap::new()),
            users: users.iter().copied().collect(),
        }
    }

    /// Insert a copy of book 1 in the given loan state
    pub async fn insert(&self, state: LoanState) -> Uuid {
        let copy = BookCopy {
            id: Uuid::new_v4(),
            book_id: 1,
            imprint: "Gollancz, 1985".to_string(),
            due_back: None,
            borrower_id: None,
            status: CopyStatus::Maintenance,
        }
        .with_loan_state(state);
        let id = copy.id;
        self.copies.lock().await.insert(id, copy);
        id
    }

    pub async fn snapshot(&self, id: Uuid) -> Option<BookCopy> {
        self.copies.lock().await.get(&id).cloned()
    }
}

#[async_trait]
impl CopyStore for MemoryCopyStore {
    async fn get_copy(&self, id: Uuid) -> AppResult<BookCopy> {
        self.snapshot(id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Copy {} not found", id)))
    }

    async fn compare_and_set(
        &self,
        id: Uuid,
        expected: LoanState,
        next: LoanState,
    ) -> AppResult<Option<BookCopy>> {
        let mut copies = self.copies.lock().await;
        match copies.get_mut(&id) {
            Some(copy) if copy.loan_state() == expected => {
                *copy = copy.clone().with_loan_state(next);
                Ok(Some(copy.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn borrower_exists(&self, user_id: i32) -> AppResult<bool> {
        Ok(self.users.contains(&user_id))
    }
}

/// Holds every write until `parties` requests have read the copy
pub struct BarrierCopyStore {
    inner: Arc<MemoryCopyStore>,
    barrier: Barrier,
}

impl BarrierCopyStore {
    pub fn new(inner: Arc<MemoryCopyStore>, parties: usize) -> Self {
        Self {
            inner,
            barrier: Barrier::new(parties),
        }
    }
}

#[async_trait]
impl CopyStore for BarrierCopyStore {
    async fn get_copy(&self, id: Uuid) -> AppResult<BookCopy> {
        self.inner.get_copy(id).await
    }

    async fn compare_and_set(
        &self,
        id: Uuid,
        expected: LoanState,
        next: LoanState,
    ) -> AppResult<Option<BookCopy>> {
        self.barrier.wait().await;
        self.inner.compare_and_set(id, expected, next).await
    }

    async fn borrower_exists(&self, user_id: i32) -> AppResult<bool> {
        self.inner.borrower_exists(user_id).await
    }
}
