//! Checking-account transaction representation.

use chrono::NaiveDate;
use std::fmt;

/// Transaction kind. Transfers move money between own accounts and are
/// excluded from the forecast report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransType {
    Withdrawal,
    Deposit,
    Transfer,
}

impl TransType {
    pub fn code(&self) -> &'static str {
        match self {
            TransType::Withdrawal => "Withdrawal",
            TransType::Deposit => "Deposit",
            TransType::Transfer => "Transfer",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "Withdrawal" => Some(TransType::Withdrawal),
            "Deposit" => Some(TransType::Deposit),
            "Transfer" => Some(TransType::Transfer),
            _ => None,
        }
    }
}

impl fmt::Display for TransType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Reconciliation status, stored as a single-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransStatus {
    #[default]
    Unreconciled,
    Reconciled,
    Void,
    FollowUp,
    Duplicate,
}

impl TransStatus {
    pub fn code(&self) -> &'static str {
        match self {
            TransStatus::Unreconciled => "",
            TransStatus::Reconciled => "R",
            TransStatus::Void => "V",
            TransStatus::FollowUp => "F",
            TransStatus::Duplicate => "D",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "" => Some(TransStatus::Unreconciled),
            "R" => Some(TransStatus::Reconciled),
            "V" => Some(TransStatus::Void),
            "F" => Some(TransStatus::FollowUp),
            "D" => Some(TransStatus::Duplicate),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: i64,
    pub account_id: i64,
    pub date: NaiveDate,
    pub txn_type: TransType,
    pub amount: f64,
    pub status: TransStatus,
    pub payee: String,
}

impl Transaction {
    /// Amount flowing out on this transaction. Void transactions count as zero.
    pub fn withdrawal(&self) -> f64 {
        if self.txn_type == TransType::Withdrawal && self.status != TransStatus::Void {
            self.amount
        } else {
            0.0
        }
    }

    /// Amount flowing in on this transaction. Void transactions count as zero.
    pub fn deposit(&self) -> f64 {
        if self.txn_type == TransType::Deposit && self.status != TransStatus::Void {
            self.amount
        } else {
            0.0
        }
    }

    pub fn is_transfer(&self) -> bool {
        self.txn_type == TransType::Transfer
    }
}
