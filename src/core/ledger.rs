use std::sync::Arc;
use uuid::Uuid;

use crate::config::EconomySettings;
use crate::core::clock::Clock;
use crate::error::CoreError;
use crate::models::{CoinPackage, CoinTransaction, CoinTransactionKind, ProfileId};
use crate::services::MatchStore;

/// Coin ledger
///
/// Every balance change is a `CoinTransaction` applied by the store in the
/// same unit of work as the balance update. The ledger validates entries and
/// never touches a balance directly.
#[derive(Clone)]
pub struct CoinLedger {
    store: Arc<dyn MatchStore>,
    clock: Arc<dyn Clock>,
    welcome_bonus: i64,
}

impl CoinLedger {
    pub fn new(store: Arc<dyn MatchStore>, clock: Arc<dyn Clock>, economy: &EconomySettings) -> Self {
        Self {
            store,
            clock,
            welcome_bonus: economy.welcome_bonus,
        }
    }

    /// Build a validated debit entry without applying it
    ///
    /// Used by operations that apply the charge together with other writes.
    pub fn prepare_debit(
        &self,
        profile: ProfileId,
        amount: i64,
        kind: CoinTransactionKind,
        description: impl Into<String>,
    ) -> Result<CoinTransaction, CoreError> {
        if amount <= 0 {
            return Err(CoreError::Validation(format!("Debit amount must be positive, got {}", amount)));
        }
        if !kind.is_debit() {
            return Err(CoreError::Validation(format!("{:?} is not a debit", kind)));
        }
        Ok(self.entry(profile, -amount, kind, description.into()))
    }

    /// Build a validated credit entry without applying it
    pub fn prepare_credit(
        &self,
        profile: ProfileId,
        amount: i64,
        kind: CoinTransactionKind,
        description: impl Into<String>,
    ) -> Result<CoinTransaction, CoreError> {
        if amount <= 0 {
            return Err(CoreError::Validation(format!("Credit amount must be positive, got {}", amount)));
        }
        if kind.is_debit() {
            return Err(CoreError::Validation(format!("{:?} is not a credit", kind)));
        }
        Ok(self.entry(profile, amount, kind, description.into()))
    }

    /// Take `amount` coins; fails with `InsufficientFunds` and no trace if
    /// the balance is too low. Returns the new balance.
    pub async fn debit(
        &self,
        profile: ProfileId,
        amount: i64,
        kind: CoinTransactionKind,
        description: impl Into<String>,
    ) -> Result<i64, CoreError> {
        let tx = self.prepare_debit(profile, amount, kind, description)?;
        let balance = self.store.apply_transaction(&tx).await?;
        tracing::info!("Debited {} coins from {} ({:?}), balance {}", amount, profile, kind, balance);
        Ok(balance)
    }

    /// Add `amount` coins. Returns the new balance.
    pub async fn credit(
        &self,
        profile: ProfileId,
        amount: i64,
        kind: CoinTransactionKind,
        description: impl Into<String>,
    ) -> Result<i64, CoreError> {
        let tx = self.prepare_credit(profile, amount, kind, description)?;
        let balance = self.store.apply_transaction(&tx).await?;
        tracing::info!("Credited {} coins to {} ({:?}), balance {}", amount, profile, kind, balance);
        Ok(balance)
    }

    pub async fn grant_welcome_bonus(&self, profile: ProfileId) -> Result<i64, CoreError> {
        self.credit(
            profile,
            self.welcome_bonus,
            CoinTransactionKind::WelcomeBonus,
            "Welcome bonus",
        )
        .await
    }

    /// Credit a package once the payment collaborator has confirmed it
    pub async fn credit_purchase(
        &self,
        profile: ProfileId,
        package: CoinPackage,
    ) -> Result<i64, CoreError> {
        self.credit(
            profile,
            package.coins(),
            CoinTransactionKind::Purchase,
            format!("Purchased {} coins", package.coins()),
        )
        .await
    }

    pub async fn refund(
        &self,
        profile: ProfileId,
        amount: i64,
        reason: &str,
    ) -> Result<i64, CoreError> {
        self.credit(profile, amount, CoinTransactionKind::Refund, format!("Refund: {}", reason))
            .await
    }

    pub async fn balance(&self, profile: ProfileId) -> Result<i64, CoreError> {
        self.store
            .get_profile(profile)
            .await?
            .map(|p| p.coins)
            .ok_or_else(|| CoreError::NotFound(format!("Profile {}", profile)))
    }

    /// Newest first
    pub async fn history(
        &self,
        profile: ProfileId,
        limit: usize,
    ) -> Result<Vec<CoinTransaction>, CoreError> {
        if limit == 0 {
            return Err(CoreError::Validation("limit must be at least 1".into()));
        }
        Ok(self.store.transactions(profile, limit).await?)
    }

    fn entry(
        &self,
        profile: ProfileId,
        amount: i64,
        kind: CoinTransactionKind,
        description: String,
    ) -> CoinTransaction {
        CoinTransaction {
            id: Uuid::new_v4(),
            profile_id: profile,
            amount,
            kind,
            description,
            created_at: self.clock.now(),
        }
    }
}
