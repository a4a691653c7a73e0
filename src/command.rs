use rust_decimal::{Decimal, prelude::Zero};
use thiserror::Error;

use crate::account::AccountId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionAction {
    Deposit,
    Withdraw,
}

/// Operation a rejected amount was submitted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    OpenAccount,
    Deposit,
    Withdraw,
    Transfer,
}

impl From<TransactionAction> for Operation {
    fn from(action: TransactionAction) -> Self {
        match action {
            TransactionAction::Deposit => Operation::Deposit,
            TransactionAction::Withdraw => Operation::Withdraw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountCommand {
    pub action: TransactionAction,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAccountCommand {
    pub id: AccountId,
    pub owner: String,
    pub initial_balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferCommand {
    pub from: AccountId,
    pub to: AccountId,
    pub amount: Decimal,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Invalid amount {amount} for {operation:?}")]
    InvalidAmount { operation: Operation, amount: Decimal },
    #[error("Cannot transfer from account {id} to itself")]
    SameAccountTransfer { id: AccountId },
}

impl AccountCommand {
    pub fn parse_command(action: TransactionAction, amount: Decimal) -> Result<Self, CommandError> {
        if amount > Decimal::zero() {
            Ok(Self { action, amount })
        } else {
            Err(CommandError::InvalidAmount {
                operation: action.into(),
                amount,
            })
        }
    }
}

impl OpenAccountCommand {
    pub fn parse_command(
        id: AccountId,
        owner: impl Into<String>,
        initial_balance: Decimal,
    ) -> Result<Self, CommandError> {
        if initial_balance < Decimal::zero() {
            return Err(CommandError::InvalidAmount {
                operation: Operation::OpenAccount,
                amount: initial_balance,
            });
        }
        Ok(Self {
            id,
            owner: owner.into(),
            initial_balance,
        })
    }
}

impl TransferCommand {
    pub fn parse_command(
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<Self, CommandError> {
        if amount <= Decimal::zero() {
            return Err(CommandError::InvalidAmount {
                operation: Operation::Transfer,
                amount,
            });
        }
        if from == to {
            return Err(CommandError::SameAccountTransfer { id: from });
        }
        Ok(Self { from, to, amount })
    }

    /// Withdrawal half of the transfer, applied to `from`.
    pub fn debit(&self) -> AccountCommand {
        AccountCommand {
            action: TransactionAction::Withdraw,
            amount: self.amount,
        }
    }

    /// Deposit half of the transfer, applied to `to`.
    pub fn credit(&self) -> AccountCommand {
        AccountCommand {
            action: TransactionAction::Deposit,
            amount: self.amount,
        }
    }
}
