//! Historical patient-surge database.
//!
//! Month-by-month surge profiles (festivals, air quality, per-disease
//! admissions) used by the hospital resource capabilities. The built-in table
//! lives in `surge_table.rs` and is built once per process; a JSON file with
//! the same shape can replace it via `SURGE_DATA_PATH`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Env var naming a JSON file that replaces the built-in surge table.
pub const SURGE_DATA_PATH_ENV: &str = "SURGE_DATA_PATH";

/// One disease category's contribution to a month's surge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurgeEntry {
    pub disease_category: String,
    pub conditions: Vec<String>,
    pub patient_count: u32,
    pub icu_admissions: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oxygen_cylinders_used: Option<u32>,
    pub primary_cause: String,
}

/// Surge profile for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRecord {
    pub month_name: String,
    pub festivals: Vec<String>,
    pub average_air_quality_index: u32,
    pub baseline_patient_count: u32,
    pub surge_entries: Vec<SurgeEntry>,
    pub total_surge_patients: u32,
    pub notes: String,
}

impl MonthRecord {
    /// Sum of `patient_count` over the month's entries.
    pub fn entry_patient_sum(&self) -> u32 {
        self.surge_entries.iter().map(|e| e.patient_count).sum()
    }
}

#[derive(Debug, Error)]
pub enum SurgeDataError {
    #[error("failed to read surge data from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse surge data from {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("surge data is missing month {0}")]
    MissingMonth(u8),

    #[error("surge data contains month {0}, expected 1-12")]
    MonthOutOfRange(u8),

    #[error("month {month} category '{category}' has {icu} ICU admissions but only {patients} patients")]
    IcuExceedsPatients {
        month: u8,
        category: String,
        icu: u32,
        patients: u32,
    },
}

/// Read-only access to surge history.
pub trait SurgeDataRepository: Send + Sync {
    /// Record for month `month` (1-12).
    fn month(&self, month: u8) -> Option<&MonthRecord>;

    /// Every record, in month order.
    fn all_months(&self) -> Vec<(u8, &MonthRecord)>;

    fn data_source(&self) -> &str;

    fn last_updated(&self) -> &str;

    /// Distinct disease categories across all months, sorted.
    fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = self
            .all_months()
            .into_iter()
            .flat_map(|(_, r)| r.surge_entries.iter().map(|e| e.disease_category.as_str()))
            .collect();
        categories.sort_unstable();
        categories.dedup();
        categories
    }
}

/// The full twelve-month surge table plus provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurgeDatabase {
    pub data_source: String,
    pub last_updated: String,
    pub months: BTreeMap<u8, MonthRecord>,
}

static BUILTIN: Lazy<SurgeDatabase> = Lazy::new(SurgeDatabase::default_database);

/// The built-in surge table, constructed on first use.
pub fn builtin() -> &'static SurgeDatabase {
    &BUILTIN
}

/// Repository for this process: the file named by `SURGE_DATA_PATH` when set
/// and valid, otherwise the built-in table.
pub fn configured_repository() -> Box<dyn SurgeDataRepository> {
    match std::env::var(SURGE_DATA_PATH_ENV) {
        Ok(path) => match SurgeDatabase::load_from_file(&path) {
            Ok(db) => {
                tracing::info!(%path, "loaded surge data from file");
                Box::new(db)
            }
            Err(e) => {
                tracing::warn!(error = %e, "falling back to built-in surge data");
                Box::new(builtin())
            }
        },
        Err(_) => Box::new(builtin()),
    }
}

impl SurgeDatabase {
    /// The built-in table. Prefer [`builtin`] to avoid rebuilding it.
    pub fn default_database() -> Self {
        crate::surge_table::default_database()
    }

    /// Load and validate a surge table from a JSON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SurgeDataError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| SurgeDataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let db: SurgeDatabase =
            serde_json::from_str(&data).map_err(|source| SurgeDataError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        db.validate()?;
        Ok(db)
    }

    /// Check structural invariants: all twelve months present, nothing outside
    /// 1-12, ICU admissions never above patient counts. A stored total that
    /// disagrees with its entries is only logged.
    pub fn validate(&self) -> Result<(), SurgeDataError> {
        if let Some(&month) = self.months.keys().find(|m| !(1..=12).contains(*m)) {
            return Err(SurgeDataError::MonthOutOfRange(month));
        }

        for month in 1..=12u8 {
            let record = self
                .months
                .get(&month)
                .ok_or(SurgeDataError::MissingMonth(month))?;

            for entry in &record.surge_entries {
                if entry.icu_admissions > entry.patient_count {
                    return Err(SurgeDataError::IcuExceedsPatients {
                        month,
                        category: entry.disease_category.clone(),
                        icu: entry.icu_admissions,
                        patients: entry.patient_count,
                    });
                }
            }

            let sum = record.entry_patient_sum();
            if sum != record.total_surge_patients {
                tracing::warn!(
                    month,
                    stored = record.total_surge_patients,
                    computed = sum,
                    "total_surge_patients does not match entry sum"
                );
            }
        }

        Ok(())
    }
}

impl SurgeDataRepository for SurgeDatabase {
    fn month(&self, month: u8) -> Option<&MonthRecord> {
        self.months.get(&month)
    }

    fn all_months(&self) -> Vec<(u8, &MonthRecord)> {
        self.months.iter().map(|(m, r)| (*m, r)).collect()
    }

    fn data_source(&self) -> &str {
        &self.data_source
    }

    fn last_updated(&self) -> &str {
        &self.last_updated
    }
}

impl<T: SurgeDataRepository + ?Sized> SurgeDataRepository for &T {
    fn month(&self, month: u8) -> Option<&MonthRecord> {
        (**self).month(month)
    }

    fn all_months(&self) -> Vec<(u8, &MonthRecord)> {
        (**self).all_months()
    }

    fn data_source(&self) -> &str {
        (**self).data_source()
    }

    fn last_updated(&self) -> &str {
        (**self).last_updated()
    }
}

impl<T: SurgeDataRepository + ?Sized> SurgeDataRepository for Box<T> {
    fn month(&self, month: u8) -> Option<&MonthRecord> {
        (**self).month(month)
    }

    fn all_months(&self) -> Vec<(u8, &MonthRecord)> {
        (**self).all_months()
    }

    fn data_source(&self) -> &str {
        (**self).data_source()
    }

    fn last_updated(&self) -> &str {
        (**self).last_updated()
    }
}
