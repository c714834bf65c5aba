//! Unit of Work pattern implementation.
//!
//! A unit of work is created per request. Every repository handed out by it
//! shares one `WorkScope`: reads run on the open transaction when there is
//! one, writes open a transaction lazily, and `save` commits it. Work left
//! uncommitted when the scope is dropped is rolled back by the driver.

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use std::sync::Arc;
use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard};

use super::repositories::{
    AccountRepository, AccountStore, CategoryRepository, CategoryStore,
    NotificationDetailRepository, NotificationDetailStore, NotificationRepository,
    NotificationStore, PaymentHistoryRepository, PaymentHistoryStore, RoleRepository, RoleStore,
};
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Provides centralized access to all repositories and transaction management.
/// Tests implement it by hand over mocked repositories.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn accounts(&self) -> Arc<dyn AccountRepository>;

    fn roles(&self) -> Arc<dyn RoleRepository>;

    fn categories(&self) -> Arc<dyn CategoryRepository>;

    fn notifications(&self) -> Arc<dyn NotificationRepository>;

    fn notification_details(&self) -> Arc<dyn NotificationDetailRepository>;

    fn payment_histories(&self) -> Arc<dyn PaymentHistoryRepository>;

    /// Persist pending writes. Inside an explicit transaction this is a
    /// flush only; `commit_transaction` makes the work durable.
    async fn save(&self) -> AppResult<()>;

    async fn begin_transaction(&self) -> AppResult<()>;

    async fn commit_transaction(&self) -> AppResult<()>;

    /// Discard pending writes. A no-op when nothing is pending.
    async fn rollback_transaction(&self) -> AppResult<()>;
}

#[derive(Default)]
pub(crate) struct ScopeState {
    txn: Option<DatabaseTransaction>,
    explicit: bool,
}

/// Connection state shared by the repositories of one unit of work.
pub struct WorkScope {
    db: DatabaseConnection,
    state: Mutex<ScopeState>,
}

impl WorkScope {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            state: Mutex::new(ScopeState::default()),
        }
    }

    pub(crate) fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Lock the scope for a read. Holds the open transaction, if any.
    pub(crate) async fn reader(&self) -> MutexGuard<'_, ScopeState> {
        self.state.lock().await
    }

    /// Transaction for a write, opened on first use.
    pub(crate) async fn writer(&self) -> AppResult<MappedMutexGuard<'_, DatabaseTransaction>> {
        let mut state = self.state.lock().await;
        let txn = match state.txn.take() {
            Some(txn) => txn,
            None => {
                tracing::debug!("Opening unit of work transaction");
                self.db.begin().await?
            }
        };
        Ok(MutexGuard::map(state, move |s| s.txn.insert(txn)))
    }

    async fn commit_pending(&self) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if state.explicit {
            return Ok(());
        }
        if let Some(txn) = state.txn.take() {
            txn.commit().await?;
            tracing::debug!("Unit of work committed");
        }
        Ok(())
    }

    async fn begin_explicit(&self) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if state.explicit {
            return Err(AppError::internal("A transaction is already in progress"));
        }
        if state.txn.is_none() {
            state.txn = Some(self.db.begin().await?);
        }
        state.explicit = true;
        Ok(())
    }

    async fn commit_explicit(&self) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if !state.explicit {
            return Err(AppError::internal("No transaction in progress"));
        }
        state.explicit = false;
        if let Some(txn) = state.txn.take() {
            txn.commit().await?;
        }
        Ok(())
    }

    async fn rollback(&self) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state.explicit = false;
        if let Some(txn) = state.txn.take() {
            txn.rollback().await?;
            tracing::debug!("Unit of work rolled back");
        }
        Ok(())
    }
}

impl ScopeState {
    pub(crate) fn transaction(&self) -> Option<&DatabaseTransaction> {
        self.txn.as_ref()
    }
}

/// Run a read on the scope's open transaction, or on the pool when none is open.
macro_rules! with_conn {
    ($scope:expr, |$conn:ident| $body:expr) => {{
        let state = $scope.reader().await;
        match state.transaction() {
            Some($conn) => $body.await,
            None => {
                let $conn = $scope.connection();
                $body.await
            }
        }
    }};
}

pub(crate) use with_conn;

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    scope: Arc<WorkScope>,
    accounts: Arc<AccountStore>,
    roles: Arc<RoleStore>,
    categories: Arc<CategoryStore>,
    notifications: Arc<NotificationStore>,
    notification_details: Arc<NotificationDetailStore>,
    payment_histories: Arc<PaymentHistoryStore>,
}

impl Persistence {
    /// Create a fresh unit of work over the connection pool.
    pub fn new(db: DatabaseConnection) -> Self {
        let scope = Arc::new(WorkScope::new(db));
        Self {
            accounts: Arc::new(AccountStore::new(scope.clone())),
            roles: Arc::new(RoleStore::new(scope.clone())),
            categories: Arc::new(CategoryStore::new(scope.clone())),
            notifications: Arc::new(NotificationStore::new(scope.clone())),
            notification_details: Arc::new(NotificationDetailStore::new(scope.clone())),
            payment_histories: Arc::new(PaymentHistoryStore::new(scope.clone())),
            scope,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
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
        self.scope.commit_pending().await
    }

    async fn begin_transaction(&self) -> AppResult<()> {
        self.scope.begin_explicit().await
    }

    async fn commit_transaction(&self) -> AppResult<()> {
        self.scope.commit_explicit().await
    }

    async fn rollback_transaction(&self) -> AppResult<()> {
        self.scope.rollback().await
    }
}
