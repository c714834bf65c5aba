//! Hand-written unit of work over mocked repositories.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::{AppError, AppResult};
use crate::infra::repositories::{
    AccountRepository, CategoryRepository, MockAccountRepository, MockCategoryRepository,
    MockNotificationDetailRepository, MockNotificationRepository, MockPaymentHistoryRepository,
    MockRoleRepository, NotificationDetailRepository, NotificationRepository,
    PaymentHistoryRepository, RoleRepository,
};
use crate::infra::UnitOfWork;

/// Repository mocks to configure before building a `TestUnitOfWork`.
#[derive(Default)]
pub struct Mocks {
    pub accounts: MockAccountRepository,
    pub roles: MockRoleRepository,
    pub categories: MockCategoryRepository,
    pub notifications: MockNotificationRepository,
    pub notification_details: MockNotificationDetailRepository,
    pub payment_histories: MockPaymentHistoryRepository,
}

impl Mocks {
    pub fn into_uow(self) -> Arc<TestUnitOfWork> {
        Arc::new(TestUnitOfWork {
            accounts: Arc::new(self.accounts),
            roles: Arc::new(self.roles),
            categories: Arc::new(self.categories),
            notifications: Arc::new(self.notifications),
            notification_details: Arc::new(self.notification_details),
            payment_histories: Arc::new(self.payment_histories),
            saves: AtomicUsize::new(0),
            begins: AtomicUsize::new(0),
            commits: AtomicUsize::new(0),
            rollbacks: AtomicUsize::new(0),
            fail_save: false,
        })
    }

    pub fn into_failing_uow(self) -> Arc<TestUnitOfWork> {
        let uow = self.into_uow();
        match Arc::try_unwrap(uow) {
            Ok(mut inner) => {
                inner.fail_save = true;
                Arc::new(inner)
            }
            Err(shared) => shared,
        }
    }
}

/// Counts every transaction call so tests can assert on persistence.
pub struct TestUnitOfWork {
    accounts: Arc<MockAccountRepository>,
    roles: Arc<MockRoleRepository>,
    categories: Arc<MockCategoryRepository>,
    notifications: Arc<MockNotificationRepository>,
    notification_details: Arc<MockNotificationDetailRepository>,
    payment_histories: Arc<MockPaymentHistoryRepository>,
    saves: AtomicUsize,
    begins: AtomicUsize,
    commits: AtomicUsize,
    rollbacks: AtomicUsize,
    fail_save: bool,
}

impl TestUnitOfWork {
    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn begins(&self) -> usize {
        self.begins.load(Ordering::SeqCst)
    }

    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    pub fn rollbacks(&self) -> usize {
        self.rollbacks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn accounts(&self) -> Arc<dyn AccountRepository> {
        self.accounts.clone()
    }

    fn roles(&self) -> Arc<dyn RoleRepository> {
        self.roles.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryRepository> {
        self.categories.clone()
    }

    fn notifications(&self) -> Arc<dyn NotificationRepository> {
        self.notifications.clone()
    }

    fn notification_details(&self) -> Arc<dyn NotificationDetailRepository> {
        self.notification_details.clone()
    }

    fn payment_histories(&self) -> Arc<dyn PaymentHistoryRepository> {
        self.payment_histories.clone()
    }

    async fn save(&self) -> AppResult<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if self.fail_save {
            return Err(AppError::internal("save failed"));
        }
        Ok(())
    }

    async fn begin_transaction(&self) -> AppResult<()> {
        self.begins.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn commit_transaction(&self) -> AppResult<()> {
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn rollback_transaction(&self) -> AppResult<()> {
        self.rollbacks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
