// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use drukbank::application::LedgerService;
use drukbank::domain::{Account, Cents, Holder};
use tempfile::TempDir;

/// Helper to create a test service with a temporary store file
pub fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let store_path = temp_dir.path().join("accounts.txt");
    let service = LedgerService::open(store_path.to_str().unwrap());
    Ok((service, temp_dir))
}

pub fn personal(owner: &str) -> Holder {
    Holder::Personal {
        owner_name: owner.into(),
    }
}

pub fn business(name: &str) -> Holder {
    Holder::Business {
        business_name: name.into(),
    }
}

/// Create an account and fund it with an opening deposit.
pub fn create_funded(service: &LedgerService, holder: Holder, amount: Cents) -> Result<Account> {
    let account = service.create_account(holder)?;
    if amount > 0 {
        service.deposit(&account.number, amount)?;
    }
    Ok(service.account(&account.number)?)
}
