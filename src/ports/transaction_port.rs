//! Transaction store port trait.

use crate::domain::error::ForecastError;
use crate::domain::transaction::Transaction;
use chrono::NaiveDate;

pub trait TransactionPort {
    /// Transactions with `start <= date <= end`, ordered by date.
    fn fetch_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Transaction>, ForecastError>;

    /// Every stored transaction, ordered by date.
    fn fetch_all(&self) -> Result<Vec<Transaction>, ForecastError>;

    /// Earliest date, latest date and transaction count, or `None` when empty.
    fn date_span(&self) -> Result<Option<(NaiveDate, NaiveDate, usize)>, ForecastError>;
}
