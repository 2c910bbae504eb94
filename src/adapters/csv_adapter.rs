//! CSV file transaction adapter.
//!
//! Reads a single ledger file with a `date,type,amount,status,payee` header.
//! Rows are assigned sequential ids in file order.

use crate::domain::error::ForecastError;
use crate::domain::transaction::{TransStatus, TransType, Transaction};
use crate::ports::transaction_port::TransactionPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    path: PathBuf,
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read_transactions(&self) -> Result<Vec<Transaction>, ForecastError> {
        let content = fs::read_to_string(&self.path).map_err(|e| ForecastError::Database {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut transactions = Vec::new();

        for (index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| ForecastError::Database {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(0).ok_or_else(|| ForecastError::Database {
                reason: "missing date column".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                ForecastError::Database {
                    reason: format!("invalid date format: {}", e),
                }
            })?;

            let type_str = record.get(1).ok_or_else(|| ForecastError::Database {
                reason: "missing type column".into(),
            })?;
            let txn_type =
                TransType::from_code(type_str).ok_or_else(|| ForecastError::Database {
                    reason: format!("unknown transaction type: {}", type_str),
                })?;

            let amount: f64 = record
                .get(2)
                .ok_or_else(|| ForecastError::Database {
                    reason: "missing amount column".into(),
                })?
                .parse()
                .map_err(|e| ForecastError::Database {
                    reason: format!("invalid amount value: {}", e),
                })?;

            let status_str = record.get(3).unwrap_or("");
            let status =
                TransStatus::from_code(status_str).ok_or_else(|| ForecastError::Database {
                    reason: format!("unknown status code: {}", status_str),
                })?;

            let payee = record.get(4).unwrap_or("").to_string();

            transactions.push(Transaction {
                id: index as i64 + 1,
                account_id: 1,
                date,
                txn_type,
                amount,
                status,
                payee,
            });
        }

        transactions.sort_by_key(|t| t.date);
        Ok(transactions)
    }
}

impl TransactionPort for CsvAdapter {
    fn fetch_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Transaction>, ForecastError> {
        let transactions = self.read_transactions()?;
        Ok(transactions
            .into_iter()
            .filter(|t| t.date >= start && t.date <= end)
            .collect())
    }

    fn fetch_all(&self) -> Result<Vec<Transaction>, ForecastError> {
        self.read_transactions()
    }

    fn date_span(&self) -> Result<Option<(NaiveDate, NaiveDate, usize)>, ForecastError> {
        let transactions = self.read_transactions()?;
        match (transactions.first(), transactions.last()) {
            (Some(first), Some(last)) => Ok(Some((first.date, last.date, transactions.len()))),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_ledger() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger.csv");

        let csv_content = "date,type,amount,status,payee\n\
            2024-01-16,Deposit,2500.00,R,Employer\n\
            2024-01-15,Withdrawal,42.50,,Grocer\n\
            2024-01-17,Transfer,300.00,,Savings\n\
            2024-01-17,Withdrawal,9.99,V,Subscription\n";

        fs::write(&path, csv_content).unwrap();
        (dir, path)
    }

    #[test]
    fn fetch_all_sorts_by_date() {
        let (_dir, path) = setup_ledger();
        let adapter = CsvAdapter::new(path);

        let transactions = adapter.fetch_all().unwrap();
        assert_eq!(transactions.len(), 4);
        assert_eq!(
            transactions[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert_eq!(transactions[0].payee, "Grocer");
        assert_eq!(transactions[1].txn_type, TransType::Deposit);
        assert_eq!(transactions[1].status, TransStatus::Reconciled);
    }

    #[test]
    fn fetch_range_filters_by_date() {
        let (_dir, path) = setup_ledger();
        let adapter = CsvAdapter::new(path);

        let start = NaiveDate::from_ymd_opt(2024, 1, 16).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 16).unwrap();
        let transactions = adapter.fetch_range(start, end).unwrap();

        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].amount, 2500.00);
    }

    #[test]
    fn void_status_is_preserved() {
        let (_dir, path) = setup_ledger();
        let adapter = CsvAdapter::new(path);

        let transactions = adapter.fetch_all().unwrap();
        let voided = transactions
            .iter()
            .find(|t| t.payee == "Subscription")
            .unwrap();
        assert_eq!(voided.status, TransStatus::Void);
        assert_eq!(voided.withdrawal(), 0.0);
    }

    #[test]
    fn date_span_reports_bounds() {
        let (_dir, path) = setup_ledger();
        let adapter = CsvAdapter::new(path);

        let (min, max, count) = adapter.date_span().unwrap().unwrap();
        assert_eq!(min, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(max, NaiveDate::from_ymd_opt(2024, 1, 17).unwrap());
        assert_eq!(count, 4);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let adapter = CsvAdapter::new(dir.path().join("absent.csv"));
        assert!(adapter.fetch_all().is_err());
    }

    #[test]
    fn bad_type_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger.csv");
        fs::write(&path, "date,type,amount,status,payee\n2024-01-15,Spend,5.0,,X\n").unwrap();

        let adapter = CsvAdapter::new(path);
        let err = adapter.fetch_all().unwrap_err();
        assert!(err.to_string().contains("unknown transaction type"));
    }
}
