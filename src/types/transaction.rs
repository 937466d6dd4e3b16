//! In-memory transaction table and the record view used for display

use crate::error::FeatureError;
use csv::StringRecord;

pub const TRANSACTION_ID: &str = "transaction_id";
pub const AMOUNT: &str = "amount";
pub const DIST_FROM_HOME: &str = "dist_from_home";
pub const MERCHANT_CATEGORY: &str = "merchant_category";
pub const IS_FRAUD: &str = "is_fraud";

/// Transaction dataset as read from disk.
///
/// Fields are kept as raw strings; numeric interpretation happens when a
/// column is requested as a feature, so a malformed column only fails the
/// detection run that needs it.
#[derive(Debug, Clone)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<StringRecord>,
}

impl Dataset {
    /// Build a dataset, trimming surrounding whitespace from column labels.
    pub fn new<I, S>(headers: I, rows: Vec<StringRecord>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            headers: headers
                .into_iter()
                .map(|h| h.as_ref().trim().to_string())
                .collect(),
            rows,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &StringRecord> {
        self.rows.iter()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Raw field at `row` in column `col`, trimmed.
    pub fn field(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col)).map(str::trim)
    }

    /// Parse a whole column as finite floating point values.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>, FeatureError> {
        let col = self
            .column_index(name)
            .ok_or_else(|| FeatureError::MissingColumn(name.to_string()))?;

        self.rows
            .iter()
            .enumerate()
            .map(|(row, record)| {
                let raw = record.get(col).unwrap_or("").trim();
                raw.parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| FeatureError::NonNumeric {
                        column: name.to_string(),
                        row,
                        value: raw.to_string(),
                    })
            })
            .collect()
    }

    /// Record view of a single row. Absent columns read as empty strings.
    pub fn transaction(&self, row: usize) -> Transaction {
        let get = |name: &str| {
            self.column_index(name)
                .and_then(|col| self.field(row, col))
                .unwrap_or("")
                .to_string()
        };

        Transaction {
            transaction_id: get(TRANSACTION_ID),
            amount: get(AMOUNT),
            dist_from_home: get(DIST_FROM_HOME),
            merchant_category: get(MERCHANT_CATEGORY),
        }
    }
}

/// Display fields of one transaction record
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Transaction {
    /// Unique transaction identifier
    pub transaction_id: String,

    /// Monetary amount
    pub amount: String,

    /// Distance from the cardholder's home
    pub dist_from_home: String,

    /// Merchant category label
    pub merchant_category: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::new(
            [" transaction_id", "amount ", " dist_from_home ", "merchant_category"],
            vec![
                StringRecord::from(vec!["tx_1", "12.5", "3.0", "grocery"]),
                StringRecord::from(vec!["tx_2", " 900 ", "250.0", "electronics"]),
            ],
        )
    }

    #[test]
    fn test_headers_are_trimmed() {
        let ds = sample();
        assert_eq!(
            ds.headers(),
            &["transaction_id", "amount", "dist_from_home", "merchant_category"]
        );
        assert_eq!(ds.column_index("amount"), Some(1));
        assert!(!ds.has_column(IS_FRAUD));
    }

    #[test]
    fn test_numeric_column() {
        let ds = sample();
        assert_eq!(ds.numeric_column(AMOUNT).unwrap(), vec![12.5, 900.0]);
        assert_eq!(
            ds.numeric_column("velocity"),
            Err(FeatureError::MissingColumn("velocity".to_string()))
        );
    }

    #[test]
    fn test_non_numeric_column() {
        let ds = sample();
        let err = ds.numeric_column(MERCHANT_CATEGORY).unwrap_err();
        assert_eq!(
            err,
            FeatureError::NonNumeric {
                column: MERCHANT_CATEGORY.to_string(),
                row: 0,
                value: "grocery".to_string(),
            }
        );
    }

    #[test]
    fn test_nan_is_rejected() {
        let ds = Dataset::new(
            ["amount"],
            vec![StringRecord::from(vec!["1.0"]), StringRecord::from(vec!["NaN"])],
        );
        assert!(matches!(
            ds.numeric_column(AMOUNT),
            Err(FeatureError::NonNumeric { row: 1, .. })
        ));
    }

    #[test]
    fn test_transaction_view() {
        let ds = sample();
        let tx = ds.transaction(1);
        assert_eq!(tx.transaction_id, "tx_2");
        assert_eq!(tx.amount, "900");
        assert_eq!(tx.merchant_category, "electronics");
    }
}
