//! Runtime configuration sourced from the environment.

use crate::inventory::Account;
use std::env;

/// Collection names as deployed.
pub const DEFAULT_WALLET: &str = "Cartera";
pub const DEFAULT_SAVINGS: &str = "Diners";
pub const DEFAULT_HISTORY: &str = "Gastos/Ingresos";

/// Names of the backing collections.
#[derive(Debug, Clone)]
pub struct Config {
    /// Wallet inventory collection.
    pub wallet_collection: String,

    /// Savings inventory collection.
    pub savings_collection: String,

    /// History collection; resolved with a fuzzy fallback when absent.
    pub history_collection: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            wallet_collection: DEFAULT_WALLET.to_string(),
            savings_collection: DEFAULT_SAVINGS.to_string(),
            history_collection: DEFAULT_HISTORY.to_string(),
        }
    }
}

impl Config {
    /// Reads collection names from `CASHBOX_WALLET`, `CASHBOX_SAVINGS` and
    /// `CASHBOX_HISTORY`, falling back to the deployed defaults.
    pub fn from_env() -> Self {
        Config {
            wallet_collection: env::var("CASHBOX_WALLET")
                .unwrap_or_else(|_| DEFAULT_WALLET.to_string()),
            savings_collection: env::var("CASHBOX_SAVINGS")
                .unwrap_or_else(|_| DEFAULT_SAVINGS.to_string()),
            history_collection: env::var("CASHBOX_HISTORY")
                .unwrap_or_else(|_| DEFAULT_HISTORY.to_string()),
        }
    }

    /// The inventory collection backing an account.
    pub fn collection_for(&self, account: Account) -> &str {
        match account {
            Account::Wallet => &self.wallet_collection,
            Account::Savings => &self.savings_collection,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_deployed_names() {
        let config = Config::default();
        assert_eq!(config.collection_for(Account::Wallet), "Cartera");
        assert_eq!(config.collection_for(Account::Savings), "Diners");
        assert_eq!(config.history_collection, "Gastos/Ingresos");
    }
}
