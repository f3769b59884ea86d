use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::domain::{Account, AccountKind, AccountNumber, Cents, Holder};

/// The whole account store, keyed by account number. A BTreeMap keeps the
/// serialized file order stable across rewrites.
pub type Store = BTreeMap<AccountNumber, Account>;

/// On-disk shape of one account line:
/// `<number>,<password>,<Business|Personal>,<balance_cents>,<business_name>,<owner_name>`
/// Exactly one of the two name fields is populated, matching the variant.
#[derive(Debug, Serialize, Deserialize)]
struct StoredRecord {
    account_number: String,
    password: String,
    account_type: String,
    balance: Cents,
    business_name: String,
    owner_name: String,
}

impl StoredRecord {
    fn from_account(account: &Account) -> Self {
        let (business_name, owner_name) = match &account.holder {
            Holder::Business { business_name } => (business_name.clone(), String::new()),
            Holder::Personal { owner_name } => (String::new(), owner_name.clone()),
        };
        Self {
            account_number: account.number.clone(),
            password: account.password.clone(),
            account_type: account.kind().as_str().to_string(),
            balance: account.balance,
            business_name,
            owner_name,
        }
    }

    fn into_account(self) -> Result<Account> {
        let holder = match AccountKind::from_str(&self.account_type) {
            Some(AccountKind::Business) => Holder::Business {
                business_name: self.business_name,
            },
            Some(AccountKind::Personal) => Holder::Personal {
                owner_name: self.owner_name,
            },
            None => bail!("unknown account type: {}", self.account_type),
        };
        Ok(Account {
            number: self.account_number,
            password: self.password,
            holder,
            balance: self.balance,
        })
    }
}

/// Repository backed by a line-oriented flat file. Every read loads the
/// full store; every write replaces the file in one atomic rename.
pub struct Repository {
    path: PathBuf,
}

impl Repository {
    /// Point the repository at a store file. The file does not have to
    /// exist yet; a missing file reads back as an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every record from the backing file. A malformed line is a
    /// reported error naming the line, never a panic.
    pub fn load(&self) -> Result<Store> {
        if !self.path.exists() {
            return Ok(Store::new());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("failed to open store file {}", self.path.display()))?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(file);

        let mut store = Store::new();
        for (index, result) in reader.deserialize().enumerate() {
            let line = index + 1;
            let record: StoredRecord = result.with_context(|| {
                format!(
                    "malformed record on line {} of {}",
                    line,
                    self.path.display()
                )
            })?;
            let account = record.into_account().with_context(|| {
                format!("invalid record on line {} of {}", line, self.path.display())
            })?;
            store.insert(account.number.clone(), account);
        }
        Ok(store)
    }

    /// Serialize every record, one per line, and atomically replace the
    /// backing file. A crash mid-save never leaves a torn store.
    pub fn save_all(&self, store: &Store) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let tmp = NamedTempFile::new_in(dir)
            .with_context(|| format!("failed to create temp file in {}", dir.display()))?;

        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(tmp.as_file());
            for account in store.values() {
                writer
                    .serialize(StoredRecord::from_account(account))
                    .with_context(|| format!("failed to serialize account {}", account.number))?;
            }
            writer.flush().context("failed to flush store file")?;
        }

        tmp.persist(&self.path)
            .map_err(|e| e.error)
            .with_context(|| format!("failed to replace store file {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn personal(number: &str, owner: &str, balance: Cents) -> Account {
        Account {
            number: number.into(),
            password: "1234".into(),
            holder: Holder::Personal {
                owner_name: owner.into(),
            },
            balance,
        }
    }

    #[test]
    fn test_record_maps_exactly_one_name_field() {
        let record = StoredRecord::from_account(&personal("123456789", "Pema", 500));
        assert_eq!(record.account_type, "Personal");
        assert_eq!(record.owner_name, "Pema");
        assert_eq!(record.business_name, "");

        let business = Account {
            number: "987654321".into(),
            password: "4321".into(),
            holder: Holder::Business {
                business_name: "Druk Bakery".into(),
            },
            balance: 0,
        };
        let record = StoredRecord::from_account(&business);
        assert_eq!(record.account_type, "Business");
        assert_eq!(record.business_name, "Druk Bakery");
        assert_eq!(record.owner_name, "");
    }

    #[test]
    fn test_record_conversion_roundtrip() {
        let original = personal("123456789", "Pema", 50000);
        let account = StoredRecord::from_account(&original).into_account().unwrap();
        assert_eq!(account, original);
    }

    #[test]
    fn test_unknown_account_type_is_rejected() {
        let record = StoredRecord {
            account_number: "123456789".into(),
            password: "1234".into(),
            account_type: "Savings".into(),
            balance: 0,
            business_name: String::new(),
            owner_name: String::new(),
        };
        assert!(record.into_account().is_err());
    }
}
