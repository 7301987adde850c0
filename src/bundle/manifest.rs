use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::core::error::{EngineError, Result};

/// An amount in minor units (pence). Totals are exact integer sums.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(pub i64);

impl Money {
    pub fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    pub fn minor(&self) -> i64 {
        self.0
    }

    /// Accepts `"20"`, `"20.5"`, `"20.50"` and a leading `-`. More than two
    /// decimals is rejected rather than rounded.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        let (negative, digits) = match value.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, value),
        };
        let (whole, fraction) = match digits.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (digits, ""),
        };
        if whole.is_empty() && fraction.is_empty() {
            return None;
        }
        if fraction.len() > 2
            || !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return None;
        }
        let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
        let cents: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().ok()? * 10,
            _ => fraction.parse().ok()?,
        };
        let minor = whole.checked_mul(100)?.checked_add(cents)?;
        Some(Money(if negative { -minor } else { minor }))
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    pub fn from_decimal(value: f64) -> Option<Self> {
        let minor = (value * 100.0).round();
        (minor.is_finite() && minor.abs() < i64::MAX as f64).then_some(Money(minor as i64))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawAmount {
            Number(f64),
            Text(String),
        }

        match RawAmount::deserialize(deserializer)? {
            RawAmount::Number(value) => Money::from_decimal(value)
                .ok_or_else(|| de::Error::custom(format!("amount {value} is out of range"))),
            RawAmount::Text(text) => Money::parse(&text)
                .ok_or_else(|| de::Error::custom(format!("invalid amount '{text}'"))),
        }
    }
}

/// One already generated document and the line it gets on the summary page.
#[derive(Debug, Clone)]
pub struct BundleEntry {
    pub document: Vec<u8>,
    pub reference: String,
    pub secondary_reference: String,
    pub amount: Money,
}

#[derive(Debug, Clone)]
pub struct BundleManifest {
    pub title: String,
    pub issued_at: Option<DateTime<Utc>>,
    pub entries: Vec<BundleEntry>,
}

impl BundleManifest {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            issued_at: None,
            entries: Vec::new(),
        }
    }

    pub fn with_entry(mut self, entry: BundleEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn grand_total(&self) -> Result<Money> {
        self.entries
            .iter()
            .enumerate()
            .try_fold(Money::default(), |total, (index, entry)| {
                total
                    .checked_add(entry.amount)
                    .ok_or(EngineError::AmountOverflow { index })
            })
    }
}

/// Manifest as read from disk: entries point at PDF files instead of holding
/// their bytes. Relative paths resolve against the manifest's directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileManifest {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub issued_at: Option<DateTime<Utc>>,
    pub entries: Vec<FileEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: PathBuf,
    pub reference: String,
    #[serde(default)]
    pub secondary_reference: String,
    pub amount: Money,
}

fn default_title() -> String {
    "Document Bundle".to_string()
}

impl FileManifest {
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn load_documents(self, base_dir: &Path) -> Result<BundleManifest> {
        let entries = self
            .entries
            .into_iter()
            .map(|entry| {
                let path = if entry.path.is_absolute() {
                    entry.path
                } else {
                    base_dir.join(entry.path)
                };
                let document = fs::read(&path).map_err(|err| {
                    EngineError::Io(std::io::Error::new(
                        err.kind(),
                        format!("{}: {err}", path.display()),
                    ))
                })?;
                Ok(BundleEntry {
                    document,
                    reference: entry.reference,
                    secondary_reference: entry.secondary_reference,
                    amount: entry.amount,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(BundleManifest {
            title: self.title,
            issued_at: self.issued_at,
            entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_decimal_strings_exactly() {
        assert_eq!(Money::parse("20.00"), Some(Money(2000)));
        assert_eq!(Money::parse("20.5"), Some(Money(2050)));
        assert_eq!(Money::parse("7"), Some(Money(700)));
        assert_eq!(Money::parse("-0.05"), Some(Money(-5)));
        assert_eq!(Money::parse("1.005"), None);
        assert_eq!(Money::parse("ten"), None);
        assert_eq!(Money::parse(""), None);
    }

    #[test]
    fn displays_two_decimals() {
        assert_eq!(Money(3500).to_string(), "35.00");
        assert_eq!(Money(-5).to_string(), "-0.05");
        assert_eq!(Money(0).to_string(), "0.00");
    }

    #[test]
    fn deserializes_numbers_and_strings() {
        let entry: FileEntry = serde_json::from_str(
            r#"{ "path": "a.pdf", "reference": "JOB-1", "amount": 10.1 }"#,
        )
        .unwrap();
        assert_eq!(entry.amount, Money(1010));
        assert_eq!(entry.secondary_reference, "");

        let entry: FileEntry = serde_json::from_str(
            r#"{ "path": "a.pdf", "reference": "JOB-1", "amount": "0.30" }"#,
        )
        .unwrap();
        assert_eq!(entry.amount, Money(30));
    }

    #[test]
    fn grand_total_is_an_exact_sum() {
        let entry = |amount: &str| BundleEntry {
            document: Vec::new(),
            reference: String::new(),
            secondary_reference: String::new(),
            amount: Money::parse(amount).unwrap(),
        };
        let manifest = BundleManifest::new("Invoice 12")
            .with_entry(entry("0.10"))
            .with_entry(entry("0.20"))
            .with_entry(entry("0.70"));
        assert_eq!(manifest.grand_total().unwrap(), Money(100));
    }

    #[test]
    fn grand_total_overflow_is_an_error() {
        let entry = |minor: i64| BundleEntry {
            document: Vec::new(),
            reference: String::new(),
            secondary_reference: String::new(),
            amount: Money::from_minor(minor),
        };
        let manifest = BundleManifest::new("Invoice 13")
            .with_entry(entry(1))
            .with_entry(entry(i64::MAX))
            .with_entry(entry(5));
        assert!(matches!(
            manifest.grand_total(),
            Err(EngineError::AmountOverflow { index: 1 })
        ));
    }

    #[test]
    fn resolves_paths_against_the_manifest_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("one.pdf"), b"%PDF-1.5").unwrap();
        let manifest: FileManifest = serde_json::from_str(
            r#"{ "title": "Batch", "entries": [ { "path": "one.pdf", "reference": "JOB-9", "amount": 5 } ] }"#,
        )
        .unwrap();
        let loaded = manifest.load_documents(dir.path()).unwrap();
        assert_eq!(loaded.entries[0].document, b"%PDF-1.5".to_vec());

        let missing: FileManifest = serde_json::from_str(
            r#"{ "entries": [ { "path": "nope.pdf", "reference": "JOB-9", "amount": 5 } ] }"#,
        )
        .unwrap();
        assert!(matches!(missing.load_documents(dir.path()), Err(EngineError::Io(_))));
    }
}
