use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::loader::LoadError;
use crate::store::UNCATEGORIZED;

/// One row of financial activity from an uploaded export
///
/// A transaction lives only for the session it was uploaded in; nothing here
/// is persisted. The `amount` is `None` when the `Balance` cell could not be
/// read as a number.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Transaction {
    date: NaiveDate,
    description: String,
    amount: Option<Decimal>,
    category: String,
}

impl Transaction {
    /// The transaction date
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// The free-text transaction description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The signed transaction amount
    ///
    /// `None` marks a `Balance` value that was not numeric in the upload.
    pub fn amount(&self) -> Option<Decimal> {
        self.amount
    }

    /// The name of the category this transaction is assigned to
    pub fn category(&self) -> &str {
        &self.category
    }

    pub(crate) fn set_category(&mut self, category: impl Into<String>) {
        self.category = category.into();
    }
}

// "Date","Description","Balance" plus whatever else the export carries;
// extra columns are ignored.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct RawRecord {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Description")]
    description: String,
    #[serde(rename = "Balance")]
    balance: String,
}

impl TryFrom<RawRecord> for Transaction {
    type Error = LoadError;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        let date = NaiveDate::parse_from_str(&raw.date, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(&raw.date, "%d/%m/%Y"))
            .map_err(|_| LoadError::InvalidDate(raw.date.clone()))?;

        // non-numeric balances become a missing marker rather than an error
        let amount = Decimal::from_str(raw.balance.trim()).ok();

        Ok(Transaction {
            date,
            description: raw.description,
            amount,
            category: UNCATEGORIZED.to_string(),
        })
    }
}
