//! Per-row labels: the detector's verdict and the optional ground truth

use crate::types::transaction::{Dataset, IS_FRAUD};
use std::fmt;

/// Detector verdict for a single transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnomalyLabel {
    Normal,
    Suspicious,
}

impl AnomalyLabel {
    /// Map a model output code (`1` inlier, `-1` outlier) to a label
    pub fn from_code(code: i8) -> Option<Self> {
        match code {
            1 => Some(AnomalyLabel::Normal),
            -1 => Some(AnomalyLabel::Suspicious),
            _ => None,
        }
    }

    /// Model output code: `1` inlier, `-1` outlier
    pub fn code(self) -> i8 {
        match self {
            AnomalyLabel::Normal => 1,
            AnomalyLabel::Suspicious => -1,
        }
    }

    /// 0/1 detection flag, comparable with the ground-truth column
    pub fn as_flag(self) -> u8 {
        match self {
            AnomalyLabel::Normal => 0,
            AnomalyLabel::Suspicious => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AnomalyLabel::Normal => "Normal",
            AnomalyLabel::Suspicious => "Suspicious",
        }
    }

    pub fn is_suspicious(self) -> bool {
        self == AnomalyLabel::Suspicious
    }
}

impl fmt::Display for AnomalyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ground-truth fraud flags, if the dataset carries them.
///
/// Values are validated strictly: any entry that is not an exact 0/1
/// encoding marks the whole column as malformed and it is never compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroundTruth {
    Absent,
    Valid(Vec<u8>),
    Malformed { row: usize, value: String },
}

impl GroundTruth {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let Some(col) = dataset.column_index(IS_FRAUD) else {
            return GroundTruth::Absent;
        };

        let mut flags = Vec::with_capacity(dataset.len());
        for row in 0..dataset.len() {
            let raw = dataset.field(row, col).unwrap_or("");
            match parse_flag(raw) {
                Some(flag) => flags.push(flag),
                None => {
                    return GroundTruth::Malformed {
                        row,
                        value: raw.to_string(),
                    }
                }
            }
        }
        GroundTruth::Valid(flags)
    }

    pub fn flags(&self) -> Option<&[u8]> {
        match self {
            GroundTruth::Valid(flags) => Some(flags),
            _ => None,
        }
    }
}

fn parse_flag(raw: &str) -> Option<u8> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "0" | "0.0" | "false" => Some(0),
        "1" | "1.0" | "true" => Some(1),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csv::StringRecord;

    #[test]
    fn test_label_from_code() {
        assert_eq!(AnomalyLabel::from_code(1), Some(AnomalyLabel::Normal));
        assert_eq!(AnomalyLabel::from_code(-1), Some(AnomalyLabel::Suspicious));
        assert_eq!(AnomalyLabel::from_code(0), None);
        assert_eq!(
            AnomalyLabel::from_code(AnomalyLabel::Suspicious.code()),
            Some(AnomalyLabel::Suspicious)
        );
        assert_eq!(AnomalyLabel::Suspicious.as_flag(), 1);
        assert_eq!(AnomalyLabel::Normal.to_string(), "Normal");
    }

    #[test]
    fn test_ground_truth_absent() {
        let ds = Dataset::new(["amount"], vec![StringRecord::from(vec!["1"])]);
        assert_eq!(GroundTruth::from_dataset(&ds), GroundTruth::Absent);
    }

    #[test]
    fn test_ground_truth_valid() {
        let ds = Dataset::new(
            ["is_fraud "],
            vec![
                StringRecord::from(vec!["0"]),
                StringRecord::from(vec![" 1 "]),
                StringRecord::from(vec!["1.0"]),
            ],
        );
        assert_eq!(GroundTruth::from_dataset(&ds), GroundTruth::Valid(vec![0, 1, 1]));
    }

    #[test]
    fn test_ground_truth_malformed() {
        let ds = Dataset::new(
            ["is_fraud"],
            vec![StringRecord::from(vec!["0"]), StringRecord::from(vec!["2"])],
        );
        let gt = GroundTruth::from_dataset(&ds);
        assert_eq!(
            gt,
            GroundTruth::Malformed {
                row: 1,
                value: "2".to_string()
            }
        );
        assert!(gt.flags().is_none());
    }
}
