#![allow(dead_code)]

use chrono::NaiveDate;
use finforecast::domain::error::ForecastError;
pub use finforecast::domain::transaction::{TransStatus, TransType, Transaction};
use finforecast::ports::transaction_port::TransactionPort;

pub struct MockTransactionPort {
    pub transactions: Vec<Transaction>,
    pub error: Option<String>,
}

impl MockTransactionPort {
    pub fn new() -> Self {
        Self {
            transactions: Vec::new(),
            error: None,
        }
    }

    pub fn with_transactions(mut self, transactions: Vec<Transaction>) -> Self {
        self.transactions = transactions;
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }

    fn check(&self) -> Result<(), ForecastError> {
        match &self.error {
            Some(reason) => Err(ForecastError::Database {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl TransactionPort for MockTransactionPort {
    fn fetch_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Transaction>, ForecastError> {
        self.check()?;
        let mut matching: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|t| t.date >= start && t.date <= end)
            .cloned()
            .collect();
        matching.sort_by_key(|t| t.date);
        Ok(matching)
    }

    fn fetch_all(&self) -> Result<Vec<Transaction>, ForecastError> {
        self.check()?;
        let mut all = self.transactions.clone();
        all.sort_by_key(|t| t.date);
        Ok(all)
    }

    fn date_span(&self) -> Result<Option<(NaiveDate, NaiveDate, usize)>, ForecastError> {
        self.check()?;
        let min = self.transactions.iter().map(|t| t.date).min();
        let max = self.transactions.iter().map(|t| t.date).max();
        match (min, max) {
            (Some(min), Some(max)) => Ok(Some((min, max, self.transactions.len()))),
            _ => Ok(None),
        }
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn make_txn(id: i64, day: &str, txn_type: TransType, amount: f64) -> Transaction {
    Transaction {
        id,
        account_id: 1,
        date: NaiveDate::parse_from_str(day, "%Y-%m-%d").unwrap(),
        txn_type,
        amount,
        status: TransStatus::Unreconciled,
        payee: "Payee".to_string(),
    }
}
