use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Where the account set lives between runs, relative to the working directory.
pub const DEFAULT_PATH: &str = "adb.csv";

/// Every amount is kept in cents.
pub const SIGNIFICANT_DIGITS: u32 = 2;

/// Session-unique handle of an account held by `Accounts`. It is handed out on insertion
/// and never reused, so two accounts with identical fields still have distinct handles.
/// It is not persisted: a new set of handles is allocated every time the file is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(pub(crate) u64);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A customer account. Field order matters: it is the column order of the
/// `name;address;balance` records on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    pub address: String,
    pub balance: Decimal,
}

impl Account {
    pub fn new(name: impl Into<String>, address: impl Into<String>, mut balance: Decimal) -> Self {
        balance.rescale(SIGNIFICANT_DIGITS);
        Self {
            name: name.into(),
            address: address.into(),
            balance,
        }
    }

    pub fn deposit(&mut self, amount: Decimal) -> Result<(), Error> {
        if amount < Decimal::ZERO {
            return Err(Error::NegativeAmount);
        }
        self.balance = exact(self.balance.checked_add(amount), self.balance, amount)?;
        Ok(())
    }

    /// Balance this account would have after withdrawing `amount`. Nothing is changed;
    /// the caller decides whether a negative result is acceptable.
    pub fn withdrawal_target(&self, amount: Decimal) -> Result<Decimal, Error> {
        if amount < Decimal::ZERO {
            return Err(Error::NegativeAmount);
        }
        exact(self.balance.checked_sub(amount), self.balance, amount)
    }
}

/// `Decimal` drops fractional digits rather than overflowing when it can; both count as
/// overflow here since balances must stay exact to the cent.
fn exact(result: Option<Decimal>, lhs: Decimal, rhs: Decimal) -> Result<Decimal, Error> {
    let scale = lhs.scale().max(rhs.scale());
    result
        .filter(|value| value.scale() >= scale)
        .ok_or(Error::Overflow)
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("input stream closed")]
    InputClosed,
    #[error("Amount must not be negative")]
    NegativeAmount,
    #[error("Amount is too large for this account")]
    Overflow,
    #[error("current account {0} is not in the registry")]
    Dangling(AccountId),
    #[error("record on line {line} has a malformed balance")]
    BadBalance { line: u64 },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}
