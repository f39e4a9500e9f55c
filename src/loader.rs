use std::io::Read;

use crate::transaction::{RawRecord, Transaction};

/// Possible errors to occur while loading an uploaded transaction file
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The upload is structurally broken: not CSV, or missing one of the
    /// required `Date`, `Description`, `Balance` columns.
    #[error("the transaction file could not be read")]
    Csv(#[from] csv::Error),
    #[error("the Date value '{0}' is not a recognized date")]
    InvalidDate(String),
}

/// Parses an uploaded CSV export into transactions
///
/// Any failure makes the whole load fail and yields no transactions: a bad
/// date in one row rejects the upload rather than silently dropping the row.
/// Non-numeric `Balance` cells are not an error; they become transactions
/// with a missing amount.
pub fn load_transactions<R: Read>(reader: R) -> Result<Vec<Transaction>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut transactions = Vec::new();
    for record in reader.deserialize() {
        let raw: RawRecord = record?;
        transactions.push(Transaction::try_from(raw)?);
    }
    Ok(transactions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn loads_a_valid_export() {
        let csv = "\
Date,Description,Balance
2026-03-14,Coffee Shop,4.50
2026-03-15,Card Payment,-120.00";
        let transactions = load_transactions(csv.as_bytes()).unwrap();
        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].description(), "Coffee Shop");
        assert_eq!(
            transactions[1].amount(),
            Some(Decimal::from_str("-120.00").unwrap())
        );
    }

    #[test]
    fn extra_columns_are_ignored() {
        let csv = "\
Date,Description,Balance,Reference,Branch
2026-03-14,Coffee Shop,4.50,X123,Downtown";
        let transactions = load_transactions(csv.as_bytes()).unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].description(), "Coffee Shop");
    }

    #[test]
    fn missing_required_column_fails_the_load() {
        let csv = "\
Date,Description
2026-03-14,Coffee Shop";
        let err = load_transactions(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Csv(_)));
    }

    #[test]
    fn one_bad_date_fails_the_whole_load() {
        let csv = "\
Date,Description,Balance
2026-03-14,Coffee Shop,4.50
soon,Bakery,3.00";
        let err = load_transactions(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::InvalidDate(date) if date == "soon"));
    }

    #[test]
    fn non_numeric_balance_does_not_fail_the_load() {
        let csv = "\
Date,Description,Balance
2026-03-14,Coffee Shop,pending";
        let transactions = load_transactions(csv.as_bytes()).unwrap();
        assert_eq!(transactions[0].amount(), None);
    }
}
