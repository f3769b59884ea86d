use crate::domain::{
    Account, AccountNumber, Cents, Holder, generate_account_number, generate_password,
};
use crate::storage::Repository;

use super::AppError;

/// Application service providing the banking operations. This is the
/// primary interface for any client (CLI, tests, etc.).
///
/// Every mutating operation reloads the full store from disk, applies the
/// change in memory, and writes the whole store back in one atomic
/// rewrite. No record survives only in memory across operations.
pub struct LedgerService {
    repo: Repository,
}

/// Outcome of a committed transfer.
pub struct TransferReceipt {
    pub amount: Cents,
    pub sender_balance: Cents,
    pub recipient: AccountNumber,
}

impl LedgerService {
    /// Create a service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Point the service at a store file, creating nothing until the
    /// first mutation.
    pub fn open(store_path: &str) -> Self {
        Self::new(Repository::open(store_path))
    }

    // ========================
    // Account lifecycle
    // ========================

    /// Open a new account for the given holder with a zero balance.
    /// Credentials are generated: a 9-digit account number (regenerated
    /// until it misses every existing record) and a 4-digit password.
    pub fn create_account(&self, holder: Holder) -> Result<Account, AppError> {
        let mut store = self.repo.load()?;
        let mut rng = rand::thread_rng();

        let number = loop {
            let candidate = generate_account_number(&mut rng);
            if !store.contains_key(&candidate) {
                break candidate;
            }
        };
        let password = generate_password(&mut rng);

        let account = Account::new(number, password, holder);
        store.insert(account.number.clone(), account.clone());
        self.repo.save_all(&store)?;
        Ok(account)
    }

    /// Authenticate by account number and password. Succeeds only on an
    /// exact, case-sensitive match; every other combination fails closed.
    pub fn login(&self, number: &str, password: &str) -> Result<Account, AppError> {
        let store = self.repo.load()?;
        match store.get(number) {
            Some(account) if account.password == password => Ok(account.clone()),
            _ => Err(AppError::AuthenticationFailure),
        }
    }

    /// Look up an account by number.
    pub fn account(&self, number: &str) -> Result<Account, AppError> {
        let store = self.repo.load()?;
        store
            .get(number)
            .cloned()
            .ok_or_else(|| AppError::AccountNotFound(number.to_string()))
    }

    /// Remove an account from the store.
    pub fn delete_account(&self, number: &str) -> Result<(), AppError> {
        let mut store = self.repo.load()?;
        if store.remove(number).is_none() {
            return Err(AppError::AccountNotFound(number.to_string()));
        }
        self.repo.save_all(&store)?;
        Ok(())
    }

    // ========================
    // Transactions
    // ========================

    /// Add a positive amount to the account balance. Returns the new
    /// balance.
    pub fn deposit(&self, number: &str, amount: Cents) -> Result<Cents, AppError> {
        require_positive(amount)?;
        let mut store = self.repo.load()?;
        let account = store
            .get_mut(number)
            .ok_or_else(|| AppError::AccountNotFound(number.to_string()))?;
        account.balance = account
            .balance
            .checked_add(amount)
            .ok_or_else(|| AppError::InvalidAmount("balance limit exceeded".to_string()))?;
        let balance = account.balance;
        self.repo.save_all(&store)?;
        Ok(balance)
    }

    /// Subtract a positive amount from the account balance. Fails with
    /// `InsufficientFunds` when the amount exceeds the balance, leaving
    /// the account untouched. Returns the new balance.
    pub fn withdraw(&self, number: &str, amount: Cents) -> Result<Cents, AppError> {
        require_positive(amount)?;
        let mut store = self.repo.load()?;
        let account = store
            .get_mut(number)
            .ok_or_else(|| AppError::AccountNotFound(number.to_string()))?;
        if amount > account.balance {
            return Err(AppError::InsufficientFunds {
                balance: account.balance,
                requested: amount,
            });
        }
        account.balance -= amount;
        let balance = account.balance;
        self.repo.save_all(&store)?;
        Ok(balance)
    }

    /// Current balance of an account. Pure read, no side effects.
    pub fn balance(&self, number: &str) -> Result<Cents, AppError> {
        Ok(self.account(number)?.balance)
    }

    /// Move a positive amount from one account to another. Both legs land
    /// in a single store rewrite, so either both apply or neither does;
    /// the sum of the two balances is conserved.
    pub fn transfer(&self, from: &str, to: &str, amount: Cents) -> Result<TransferReceipt, AppError> {
        require_positive(amount)?;
        if from == to {
            return Err(AppError::TransferToSelf);
        }

        let mut store = self.repo.load()?;
        if !store.contains_key(to) {
            return Err(AppError::AccountNotFound(to.to_string()));
        }

        let sender = store
            .get_mut(from)
            .ok_or_else(|| AppError::AccountNotFound(from.to_string()))?;
        if amount > sender.balance {
            return Err(AppError::InsufficientFunds {
                balance: sender.balance,
                requested: amount,
            });
        }
        sender.balance -= amount;
        let sender_balance = sender.balance;

        let recipient = store
            .get_mut(to)
            .ok_or_else(|| AppError::AccountNotFound(to.to_string()))?;
        // Failing here discards the in-memory sender debit; nothing is
        // persisted unless both legs fit
        recipient.balance = recipient
            .balance
            .checked_add(amount)
            .ok_or_else(|| AppError::InvalidAmount("balance limit exceeded".to_string()))?;

        self.repo.save_all(&store)?;
        Ok(TransferReceipt {
            amount,
            sender_balance,
            recipient: to.to_string(),
        })
    }

    // ========================
    // Account details
    // ========================

    /// Re-key an account under a new number. Rejected when the new number
    /// already exists. The rename is one rewrite: the old key is gone and
    /// the new key present in the same save.
    pub fn change_account_number(&self, old: &str, new: &str) -> Result<Account, AppError> {
        let mut store = self.repo.load()?;
        if store.contains_key(new) {
            return Err(AppError::DuplicateAccountNumber(new.to_string()));
        }
        let mut account = store
            .remove(old)
            .ok_or_else(|| AppError::AccountNotFound(old.to_string()))?;
        account.number = new.to_string();
        store.insert(account.number.clone(), account.clone());
        self.repo.save_all(&store)?;
        Ok(account)
    }

    /// Overwrite the account password. No strength constraint.
    pub fn change_password(&self, number: &str, new_password: &str) -> Result<(), AppError> {
        let mut store = self.repo.load()?;
        let account = store
            .get_mut(number)
            .ok_or_else(|| AppError::AccountNotFound(number.to_string()))?;
        account.password = new_password.to_string();
        self.repo.save_all(&store)?;
        Ok(())
    }
}

fn require_positive(amount: Cents) -> Result<(), AppError> {
    if amount <= 0 {
        return Err(AppError::InvalidAmount(
            "amount must be positive".to_string(),
        ));
    }
    Ok(())
}
