use thiserror::Error;

use crate::domain::Cents;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Invalid account number or password")]
    AuthenticationFailure,

    #[error("Account number already exists: {0}")]
    DuplicateAccountNumber(String),

    #[error("Insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds { balance: Cents, requested: Cents },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Cannot transfer to the same account")]
    TransferToSelf,

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}
