//! Bank configuration

use serde::{Deserialize, Serialize};

/// What happens to the id of a closed account.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IdReusePolicy {
    /// Closed ids stay reserved for the life of the bank.
    #[default]
    Reserve,
    /// A closed id may be given to a newly created account.
    AllowAfterClose,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BankConfig {
    /// Bank name
    pub name: String,

    /// Id reuse policy for closed accounts
    pub id_reuse: IdReusePolicy,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            name: "bank".to_string(),
            id_reuse: IdReusePolicy::default(),
        }
    }
}
