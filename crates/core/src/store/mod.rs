//! In-memory stores and the shared handle that owns them.
//!
//! # Stores
//!
//! - [`UserStore`] - identity store (users, username uniqueness)
//! - [`PurchaseLedger`] - purchase submissions (bill-number uniqueness)
//! - [`CouponRegistry`] - one coupon per verified purchase
//!
//! Each store guards its maps with a single `RwLock`. Check-then-insert and
//! state transitions happen under one write guard, so concurrent callers
//! cannot both pass a uniqueness check.
//!
//! Nothing here survives a restart. [`CashbackStore`] is created once at
//! process start and cloned into whatever needs it.

pub mod coupons;
pub mod purchases;
pub mod users;

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub use coupons::CouponRegistry;
pub use purchases::PurchaseLedger;
pub use users::UserStore;

use crate::capability::{Clock, CredentialHasher, OsRandom, RandomSource, SystemClock};
use crate::error::{CashbackError, Result};
use crate::services::{AccountService, LifecycleService};
use crate::types::CashbackRate;

pub(crate) fn read<'a, T>(lock: &'a RwLock<T>, store: &'static str) -> Result<RwLockReadGuard<'a, T>> {
    lock.read().map_err(|_| CashbackError::LockPoisoned(store))
}

pub(crate) fn write<'a, T>(
    lock: &'a RwLock<T>,
    store: &'static str,
) -> Result<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|_| CashbackError::LockPoisoned(store))
}

/// Shared handle to the cashback engine.
///
/// Cheaply cloneable via `Arc`. Owns the three stores plus the capabilities
/// they need (clock, random source, credential hasher) and the default
/// cashback rate.
#[derive(Clone)]
pub struct CashbackStore {
    inner: Arc<CashbackStoreInner>,
}

struct CashbackStoreInner {
    users: UserStore,
    purchases: PurchaseLedger,
    coupons: CouponRegistry,
    clock: Arc<dyn Clock>,
    random: Arc<dyn RandomSource>,
    hasher: Arc<dyn CredentialHasher>,
    default_rate: CashbackRate,
}

impl std::fmt::Debug for CashbackStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CashbackStore")
            .field("default_rate", &self.inner.default_rate)
            .finish_non_exhaustive()
    }
}

/// Builder for [`CashbackStore`].
///
/// Only the credential hasher is required; the clock defaults to the system
/// clock, the random source to the OS-seeded CSPRNG and the rate to 4%.
pub struct CashbackStoreBuilder {
    clock: Arc<dyn Clock>,
    random: Arc<dyn RandomSource>,
    hasher: Arc<dyn CredentialHasher>,
    default_rate: CashbackRate,
}

impl CashbackStoreBuilder {
    /// Replace the clock.
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the random source used for coupon codes.
    #[must_use]
    pub fn random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    /// Set the rate applied when a verifier does not name an amount.
    #[must_use]
    pub fn default_rate(mut self, rate: CashbackRate) -> Self {
        self.default_rate = rate;
        self
    }

    /// Build the store.
    #[must_use]
    pub fn build(self) -> CashbackStore {
        CashbackStore {
            inner: Arc::new(CashbackStoreInner {
                users: UserStore::new(),
                purchases: PurchaseLedger::new(),
                coupons: CouponRegistry::new(),
                clock: self.clock,
                random: self.random,
                hasher: self.hasher,
                default_rate: self.default_rate,
            }),
        }
    }
}

impl CashbackStore {
    /// Start building a store around a credential hasher.
    #[must_use]
    pub fn builder(hasher: Arc<dyn CredentialHasher>) -> CashbackStoreBuilder {
        CashbackStoreBuilder {
            clock: Arc::new(SystemClock),
            random: Arc::new(OsRandom),
            hasher,
            default_rate: CashbackRate::default(),
        }
    }

    /// Identity store.
    #[must_use]
    pub fn users(&self) -> &UserStore {
        &self.inner.users
    }

    /// Purchase ledger.
    #[must_use]
    pub fn purchases(&self) -> &PurchaseLedger {
        &self.inner.purchases
    }

    /// Coupon registry.
    #[must_use]
    pub fn coupons(&self) -> &CouponRegistry {
        &self.inner.coupons
    }

    /// Clock used for timestamps.
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.inner.clock.as_ref()
    }

    /// Random source used for coupon codes.
    #[must_use]
    pub fn random(&self) -> &dyn RandomSource {
        self.inner.random.as_ref()
    }

    /// Credential hasher used for passwords.
    #[must_use]
    pub fn hasher(&self) -> &dyn CredentialHasher {
        self.inner.hasher.as_ref()
    }

    /// Rate applied when a verifier does not name an amount.
    #[must_use]
    pub fn default_rate(&self) -> CashbackRate {
        self.inner.default_rate
    }

    /// Registration and login operations.
    #[must_use]
    pub const fn accounts(&self) -> AccountService<'_> {
        AccountService::new(self)
    }

    /// Purchase and coupon lifecycle operations.
    #[must_use]
    pub const fn lifecycle(&self) -> LifecycleService<'_> {
        LifecycleService::new(self)
    }
}
