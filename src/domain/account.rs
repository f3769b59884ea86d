use rand::Rng;

use super::Cents;

pub type AccountNumber = String;

/// Number of decimal digits in a generated account number.
pub const ACCOUNT_NUMBER_DIGITS: usize = 9;

/// Number of decimal digits in a generated password.
pub const PASSWORD_DIGITS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountKind {
    Business,
    Personal,
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Business => "Business",
            AccountKind::Personal => "Personal",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Business" => Some(AccountKind::Business),
            "Personal" => Some(AccountKind::Personal),
            _ => None,
        }
    }
}

impl std::fmt::Display for AccountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Account holder identity. Each variant carries only the name field that
/// belongs to it; the name is free-form and may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Holder {
    Business { business_name: String },
    Personal { owner_name: String },
}

impl Holder {
    pub fn kind(&self) -> AccountKind {
        match self {
            Holder::Business { .. } => AccountKind::Business,
            Holder::Personal { .. } => AccountKind::Personal,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Holder::Business { business_name } => business_name,
            Holder::Personal { owner_name } => owner_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub number: AccountNumber,
    pub password: String,
    pub holder: Holder,
    pub balance: Cents,
}

impl Account {
    /// Create an account with a zero opening balance.
    pub fn new(number: AccountNumber, password: String, holder: Holder) -> Self {
        Self {
            number,
            password,
            holder,
            balance: 0,
        }
    }

    pub fn kind(&self) -> AccountKind {
        self.holder.kind()
    }
}

/// Generate a random 9-digit account number. The random source is not
/// cryptographic; uniqueness against the store is the caller's concern.
pub fn generate_account_number<R: Rng>(rng: &mut R) -> AccountNumber {
    rng.gen_range(100_000_000u64..=999_999_999).to_string()
}

/// Generate a random 4-digit password.
pub fn generate_password<R: Rng>(rng: &mut R) -> String {
    rng.gen_range(1000u32..=9999).to_string()
}
