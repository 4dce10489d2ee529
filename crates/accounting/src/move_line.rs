use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockwork_core::{DomainError, DomainResult};

/// High-level account kind (determines normal balance side).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Asset,
    Liability,
    Equity,
    Revenue,
    Expense,
}

/// Account identifier + metadata. Accounts are identified by `code`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Account {
    pub code: String, // e.g. "1310"
    pub name: String, // e.g. "Stock Supplier"
    pub kind: AccountKind,
}

impl Account {
    pub fn new(code: impl Into<String>, name: impl Into<String>, kind: AccountKind) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            kind,
        }
    }
}

/// One line of an account move.
///
/// Both sides are carried explicitly; a line usually has one of them at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountMoveLine {
    pub name: String,
    pub account: Account,
    pub debit: Decimal,
    pub credit: Decimal,
}

impl AccountMoveLine {
    pub fn debit(name: impl Into<String>, account: Account, amount: Decimal) -> Self {
        Self {
            name: name.into(),
            account,
            debit: amount,
            credit: Decimal::ZERO,
        }
    }

    pub fn credit(name: impl Into<String>, account: Account, amount: Decimal) -> Self {
        Self {
            name: name.into(),
            account,
            debit: Decimal::ZERO,
            credit: amount,
        }
    }

    /// Debit minus credit.
    pub fn balance(&self) -> Decimal {
        self.debit - self.credit
    }
}

/// Sum of debits and sum of credits.
pub fn totals(lines: &[AccountMoveLine]) -> (Decimal, Decimal) {
    lines.iter().fold((Decimal::ZERO, Decimal::ZERO), |(debit, credit), line| {
        (debit + line.debit, credit + line.credit)
    })
}

/// Reject empty or unbalanced line sets, and lines with a negative side.
pub fn ensure_balanced(lines: &[AccountMoveLine]) -> DomainResult<()> {
    if lines.is_empty() {
        return Err(DomainError::validation("account move must have lines"));
    }
    for line in lines {
        if line.debit < Decimal::ZERO || line.credit < Decimal::ZERO {
            return Err(DomainError::validation(format!(
                "line on {} has a negative side",
                line.account.code
            )));
        }
    }
    let (debit, credit) = totals(lines);
    if debit != credit {
        return Err(DomainError::invariant("debits must equal credits"));
    }
    Ok(())
}
