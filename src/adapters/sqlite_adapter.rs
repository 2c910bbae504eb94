//! SQLite transaction store adapter.

use crate::domain::error::ForecastError;
use crate::domain::transaction::{TransStatus, TransType, Transaction};
use crate::ports::config_port::ConfigPort;
use crate::ports::transaction_port::TransactionPort;
use chrono::NaiveDate;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

pub struct SqliteAdapter {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, ForecastError> {
        let db_path =
            config
                .get_string("sqlite", "path")
                .ok_or_else(|| ForecastError::ConfigMissing {
                    section: "sqlite".into(),
                    key: "path".into(),
                })?;

        let pool_size = config.get_int("sqlite", "pool_size", 4) as u32;

        let manager = SqliteConnectionManager::file(&db_path);
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .map_err(|e: r2d2::Error| ForecastError::Database {
                reason: e.to_string(),
            })?;

        Ok(Self { pool })
    }

    pub fn in_memory() -> Result<Self, ForecastError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e: r2d2::Error| ForecastError::Database {
                reason: e.to_string(),
            })?;

        Ok(Self { pool })
    }

    pub fn initialize_schema(&self) -> Result<(), ForecastError> {
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| ForecastError::Database {
                reason: e.to_string(),
            })?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS checkingaccount (
                transid INTEGER PRIMARY KEY,
                accountid INTEGER NOT NULL,
                transdate TEXT NOT NULL,
                transcode TEXT NOT NULL,
                transamount REAL NOT NULL,
                status TEXT NOT NULL DEFAULT '',
                payee TEXT NOT NULL DEFAULT ''
            );
            CREATE INDEX IF NOT EXISTS idx_checkingaccount_transdate ON checkingaccount(transdate);",
        )
        .map_err(|e: rusqlite::Error| ForecastError::DatabaseQuery {
            reason: e.to_string(),
        })?;

        Ok(())
    }

    pub fn insert_transactions(&self, transactions: &[Transaction]) -> Result<(), ForecastError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| ForecastError::Database {
                reason: e.to_string(),
            })?;

        let tx = conn
            .transaction()
            .map_err(|e: rusqlite::Error| ForecastError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        for txn in transactions {
            tx.execute(
                "INSERT OR REPLACE INTO checkingaccount
                     (transid, accountid, transdate, transcode, transamount, status, payee)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    txn.id,
                    txn.account_id,
                    txn.date.format("%Y-%m-%d").to_string(),
                    txn.txn_type.code(),
                    txn.amount,
                    txn.status.code(),
                    txn.payee
                ],
            )
            .map_err(|e: rusqlite::Error| ForecastError::DatabaseQuery {
                reason: e.to_string(),
            })?;
        }

        tx.commit()
            .map_err(|e: rusqlite::Error| ForecastError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        Ok(())
    }

    fn query_transactions(
        &self,
        query: &str,
        args: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<Transaction>, ForecastError> {
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| ForecastError::Database {
                reason: e.to_string(),
            })?;

        let mut stmt =
            conn.prepare(query)
                .map_err(|e: rusqlite::Error| ForecastError::DatabaseQuery {
                    reason: e.to_string(),
                })?;

        let rows = stmt
            .query_map(args, |row| {
                let date_str: String = row.get(2)?;
                let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        date_str.len(),
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?;
                let code: String = row.get(3)?;
                let txn_type = TransType::from_code(&code).ok_or_else(|| {
                    rusqlite::Error::FromSqlConversionFailure(
                        code.len(),
                        rusqlite::types::Type::Text,
                        format!("unknown transaction type: {code}").into(),
                    )
                })?;
                let status_code: String = row.get(5)?;
                let status = TransStatus::from_code(&status_code).ok_or_else(|| {
                    rusqlite::Error::FromSqlConversionFailure(
                        status_code.len(),
                        rusqlite::types::Type::Text,
                        format!("unknown status code: {status_code}").into(),
                    )
                })?;
                Ok(Transaction {
                    id: row.get(0)?,
                    account_id: row.get(1)?,
                    date,
                    txn_type,
                    amount: row.get(4)?,
                    status,
                    payee: row.get(6)?,
                })
            })
            .map_err(|e: rusqlite::Error| ForecastError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        let mut transactions = Vec::new();
        for row in rows {
            transactions.push(row.map_err(|e: rusqlite::Error| ForecastError::DatabaseQuery {
                reason: e.to_string(),
            })?);
        }

        Ok(transactions)
    }
}

impl TransactionPort for SqliteAdapter {
    fn fetch_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Transaction>, ForecastError> {
        let start_str = start.format("%Y-%m-%d").to_string();
        let end_str = end.format("%Y-%m-%d").to_string();

        self.query_transactions(
            "SELECT transid, accountid, transdate, transcode, transamount, status, payee
             FROM checkingaccount
             WHERE transdate >= ?1 AND transdate <= ?2
             ORDER BY transdate ASC",
            &[&start_str, &end_str],
        )
    }

    fn fetch_all(&self) -> Result<Vec<Transaction>, ForecastError> {
        self.query_transactions(
            "SELECT transid, accountid, transdate, transcode, transamount, status, payee
             FROM checkingaccount
             ORDER BY transdate ASC",
            &[],
        )
    }

    fn date_span(&self) -> Result<Option<(NaiveDate, NaiveDate, usize)>, ForecastError> {
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| ForecastError::Database {
                reason: e.to_string(),
            })?;

        let query = "SELECT MIN(transdate), MAX(transdate), COUNT(*) FROM checkingaccount";

        let result: (Option<String>, Option<String>, i64) = conn
            .query_row(query, [], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
            .map_err(|e: rusqlite::Error| ForecastError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        match result {
            (Some(min_str), Some(max_str), count) if count > 0 => {
                let min = NaiveDate::parse_from_str(&min_str, "%Y-%m-%d").map_err(
                    |e: chrono::ParseError| ForecastError::Database {
                        reason: e.to_string(),
                    },
                )?;
                let max = NaiveDate::parse_from_str(&max_str, "%Y-%m-%d").map_err(
                    |e: chrono::ParseError| ForecastError::Database {
                        reason: e.to_string(),
                    },
                )?;
                Ok(Some((min, max, count as usize)))
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EmptyConfig;

    impl ConfigPort for EmptyConfig {
        fn get_string(&self, _section: &str, _key: &str) -> Option<String> {
            None
        }
        fn get_int(&self, _section: &str, _key: &str, default: i64) -> i64 {
            default
        }
        fn get_double(&self, _section: &str, _key: &str, default: f64) -> f64 {
            default
        }
        fn get_bool(&self, _section: &str, _key: &str, default: bool) -> bool {
            default
        }
    }

    fn txn(id: i64, date: &str, txn_type: TransType, amount: f64) -> Transaction {
        Transaction {
            id,
            account_id: 1,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            txn_type,
            amount,
            status: TransStatus::Unreconciled,
            payee: "Payee".into(),
        }
    }

    #[test]
    fn from_config_missing_path() {
        let config = EmptyConfig;
        let result = SqliteAdapter::from_config(&config);
        match result {
            Err(ForecastError::ConfigMissing { section, key }) => {
                assert_eq!(section, "sqlite");
                assert_eq!(key, "path");
            }
            Err(other) => panic!("expected ConfigMissing, got: {other}"),
            Ok(_) => panic!("expected error, got Ok"),
        }
    }

    #[test]
    fn in_memory_initialization() {
        let adapter = SqliteAdapter::in_memory().unwrap();
        adapter.initialize_schema().unwrap();
    }

    #[test]
    fn fetch_range_returns_ordered_transactions() {
        let adapter = SqliteAdapter::in_memory().unwrap();
        adapter.initialize_schema().unwrap();

        adapter
            .insert_transactions(&[
                txn(2, "2024-01-20", TransType::Deposit, 250.0),
                txn(1, "2024-01-10", TransType::Withdrawal, 42.5),
                txn(3, "2024-02-05", TransType::Withdrawal, 10.0),
            ])
            .unwrap();

        let fetched = adapter
            .fetch_range(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            )
            .unwrap();

        assert_eq!(fetched.len(), 2);
        assert_eq!(fetched[0].id, 1);
        assert_eq!(fetched[0].amount, 42.5);
        assert_eq!(fetched[1].txn_type, TransType::Deposit);
    }

    #[test]
    fn fetch_all_returns_everything() {
        let adapter = SqliteAdapter::in_memory().unwrap();
        adapter.initialize_schema().unwrap();

        adapter
            .insert_transactions(&[
                txn(1, "2024-01-10", TransType::Withdrawal, 42.5),
                txn(2, "2024-03-20", TransType::Transfer, 500.0),
            ])
            .unwrap();

        let fetched = adapter.fetch_all().unwrap();
        assert_eq!(fetched.len(), 2);
        assert!(fetched[1].is_transfer());
    }

    #[test]
    fn status_round_trips_through_storage() {
        let adapter = SqliteAdapter::in_memory().unwrap();
        adapter.initialize_schema().unwrap();

        let mut voided = txn(1, "2024-01-10", TransType::Withdrawal, 42.5);
        voided.status = TransStatus::Void;
        adapter.insert_transactions(&[voided]).unwrap();

        let fetched = adapter.fetch_all().unwrap();
        assert_eq!(fetched[0].status, TransStatus::Void);
        assert_eq!(fetched[0].withdrawal(), 0.0);
    }

    #[test]
    fn date_span_over_data() {
        let adapter = SqliteAdapter::in_memory().unwrap();
        adapter.initialize_schema().unwrap();

        adapter
            .insert_transactions(&[
                txn(1, "2024-01-10", TransType::Withdrawal, 42.5),
                txn(2, "2024-04-01", TransType::Deposit, 100.0),
            ])
            .unwrap();

        let span = adapter.date_span().unwrap();
        assert!(span.is_some());
        let (min, max, count) = span.unwrap();
        assert_eq!(min, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        assert_eq!(max, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
        assert_eq!(count, 2);
    }

    #[test]
    fn date_span_no_data() {
        let adapter = SqliteAdapter::in_memory().unwrap();
        adapter.initialize_schema().unwrap();

        let span = adapter.date_span().unwrap();
        assert!(span.is_none());
    }
}
