//! In-memory store implementations.
//!
//! Back the workflow test suites and local experimentation with the same
//! call contract as the `PostgreSQL` stores. Both stores count their write
//! operations and remember the last update payload so tests can assert that
//! a workflow performed (or skipped) a specific store call.

use std::sync::Mutex;
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};

use chrono::Utc;

use clementine_core::{OrderId, UserId};

use super::RepositoryError;
use super::orders::OrderStore;
use super::users::IdentityStore;
use crate::models::{NewUser, Order, User, UserUpdate};

/// In-memory identity store.
#[derive(Default)]
pub struct MemoryIdentityStore {
    users: Mutex<Vec<User>>,
    next_id: AtomicI32,
    inserts: AtomicUsize,
    updates: AtomicUsize,
    last_update: Mutex<Option<(UserId, UserUpdate)>>,
}

impl MemoryIdentityStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `create` calls performed.
    #[must_use]
    pub fn inserts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    /// Number of `update` calls performed.
    #[must_use]
    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    /// The payload of the most recent `update` call, if any.
    #[must_use]
    pub fn last_update(&self) -> Option<(UserId, UserUpdate)> {
        self.last_update
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or(None)
    }

    fn lock_users(&self) -> Result<std::sync::MutexGuard<'_, Vec<User>>, RepositoryError> {
        self.users
            .lock()
            .map_err(|_| RepositoryError::Conflict("store lock poisoned".to_owned()))
    }
}

impl IdentityStore for &MemoryIdentityStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let users = self.lock_users()?;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_email_and_answer(
        &self,
        email: &str,
        answer: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let users = self.lock_users()?;
        Ok(users
            .iter()
            .find(|u| u.email == email && u.answer == answer)
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let users = self.lock_users()?;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, fields: NewUser) -> Result<User, RepositoryError> {
        let mut users = self.lock_users()?;
        if users.iter().any(|u| u.email == fields.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        self.inserts.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let user = User {
            id: UserId::new(self.next_id.fetch_add(1, Ordering::SeqCst) + 1),
            name: fields.name,
            email: fields.email,
            password_hash: fields.password_hash,
            phone: fields.phone,
            address: fields.address,
            answer: fields.answer,
            role: fields.role,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, id: UserId, update: UserUpdate) -> Result<User, RepositoryError> {
        let mut users = self.lock_users()?;

        self.updates.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_update.lock() {
            *last = Some((id, update.clone()));
        }

        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(RepositoryError::NotFound)?;

        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(password_hash) = update.password_hash {
            user.password_hash = password_hash;
        }
        if let Some(phone) = update.phone {
            user.phone = phone;
        }
        if let Some(address) = update.address {
            user.address = address;
        }
        user.updated_at = Utc::now();

        Ok(user.clone())
    }
}

/// In-memory order store.
#[derive(Default)]
pub struct MemoryOrderStore {
    orders: Mutex<Vec<Order>>,
    status_updates: AtomicUsize,
    last_status_update: Mutex<Option<(OrderId, String)>>,
}

impl MemoryOrderStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an order record, as the (out-of-scope) purchase workflow would.
    pub fn push(&self, order: Order) {
        if let Ok(mut orders) = self.orders.lock() {
            orders.push(order);
        }
    }

    /// Number of `update_status` calls performed.
    #[must_use]
    pub fn status_updates(&self) -> usize {
        self.status_updates.load(Ordering::SeqCst)
    }

    /// The payload of the most recent `update_status` call, if any.
    #[must_use]
    pub fn last_status_update(&self) -> Option<(OrderId, String)> {
        self.last_status_update
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or(None)
    }

    fn lock_orders(&self) -> Result<std::sync::MutexGuard<'_, Vec<Order>>, RepositoryError> {
        self.orders
            .lock()
            .map_err(|_| RepositoryError::Conflict("store lock poisoned".to_owned()))
    }
}

impl OrderStore for &MemoryOrderStore {
    async fn find_by_buyer(&self, buyer: UserId) -> Result<Vec<Order>, RepositoryError> {
        let orders = self.lock_orders()?;
        Ok(orders
            .iter()
            .filter(|o| o.buyer.id == buyer)
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let orders = self.lock_orders()?;
        let mut all: Vec<Order> = orders.clone();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn update_status(
        &self,
        id: OrderId,
        status: &str,
    ) -> Result<Option<Order>, RepositoryError> {
        self.status_updates.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_status_update.lock() {
            *last = Some((id, status.to_owned()));
        }

        let mut orders = self.lock_orders()?;
        let Some(order) = orders.iter_mut().find(|o| o.id == id) else {
            return Ok(None);
        };

        order.status = status.to_owned();
        order.updated_at = Utc::now();
        Ok(Some(order.clone()))
    }
}
