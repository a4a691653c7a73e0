/// Single account state: balance, entry log and lifecycle.
/// Every mutation is validated into a ledger entry first, then applied.
pub mod account;

/// Validated commands for accounts, account creation and transfers.
pub mod command;

/// Append-only per-account log of ledger entries, plus read-only snapshots.
pub mod entry_log;

/// Account directory interface, plus "in memory" implementation.
///
/// NOTE: The bank defaults to the in memory implementation, the trait is
/// the place to plug in a different store.
pub mod directory;

/// Coordinates account lifecycle, transfers and aggregate queries across
/// concurrent callers.
pub mod bank;

/// Bank name and account id reuse policy.
pub mod config;

pub use account::{Account, AccountError, AccountId, AccountStatus, AccountSummary};
pub use bank::{Bank, BankError};
pub use command::CommandError;
pub use config::{BankConfig, IdReusePolicy};
pub use directory::DirectoryError;
pub use entry_log::{EntryKind, History, LedgerEntry};
