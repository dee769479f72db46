use std::collections::BTreeMap;

use capability_common::{CapabilityError, MonthRecord, SurgeDataRepository, Tool};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// Tool name as exposed over the stdio protocol.
pub const TOOL_NAME: &str = "get_historical_surge_data";

/// Months whose total surge exceeds this are flagged as critical.
pub const CRITICAL_SURGE_THRESHOLD: u32 = 1000;

/// Category wildcard meaning "no category filter".
pub const ALL_CATEGORIES: &str = "all";

/// Standing observations attached to every report.
pub const PREDICTION_NOTES: &[&str] = &[
    "Respiratory admissions climb from October through January as stubble burning, firecrackers and winter inversion push AQI above 300.",
    "November is consistently the busiest month: build oxygen cylinder reserves and burn-unit staffing before Diwali week.",
    "July to September carries the heaviest vector-borne and water-borne load; stock dengue test kits, platelets and IV fluids by late June.",
    "Heat-related ICU demand peaks in May, driven by heat stroke and acute kidney injury.",
    "Festival days (Holi, Ganesh immersion, Durga Puja, New Year's Eve) raise trauma and accident cases for two to three days around the event.",
];

/// Filters for a surge history query. Both are optional; any other key is
/// rejected so a misspelt filter cannot silently widen the query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SurgeQuery {
    #[serde(default, deserialize_with = "lenient_month")]
    pub month: Option<i64>,
    #[serde(default)]
    pub disease_category: Option<String>,
}

impl SurgeQuery {
    pub fn for_month(month: i64) -> Self {
        Self {
            month: Some(month),
            disease_category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.disease_category = Some(category.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurgeQueryError {
    #[error("Invalid month: {0}. Month must be between 1 and 12.")]
    InvalidMonth(i64),
}

/// Aggregates over the months left after filtering.
///
/// `highest_surge_month` and `highest_surge_count` are `null` when no month
/// matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurgeSummary {
    pub total_months_analyzed: usize,
    pub highest_surge_month: Option<String>,
    pub highest_surge_count: Option<u32>,
    pub critical_alert_months: Vec<String>,
    pub data_source: String,
    pub last_updated: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurgeReport {
    pub summary: SurgeSummary,
    pub historical_data: BTreeMap<u8, MonthRecord>,
    pub prediction_notes: Vec<String>,
}

/// Query surge history with optional month and disease-category filters.
///
/// A category filter narrows each month's entries to that category (exact,
/// case-sensitive) and drops months left without entries. Records are copied;
/// the repository is never modified.
pub fn query_surge_data<R>(repo: &R, query: &SurgeQuery) -> Result<SurgeReport, SurgeQueryError>
where
    R: SurgeDataRepository + ?Sized,
{
    let candidates: Vec<(u8, &MonthRecord)> = match query.month {
        Some(month) => {
            let valid = u8::try_from(month)
                .ok()
                .filter(|m| (1..=12).contains(m))
                .ok_or(SurgeQueryError::InvalidMonth(month))?;
            repo.month(valid).map(|r| (valid, r)).into_iter().collect()
        }
        None => repo.all_months(),
    };

    let category = query
        .disease_category
        .as_deref()
        .filter(|c| *c != ALL_CATEGORIES);

    let historical_data: BTreeMap<u8, MonthRecord> = candidates
        .into_iter()
        .filter_map(|(month, record)| match category {
            Some(category) => restrict_to_category(record, category).map(|r| (month, r)),
            None => Some((month, record.clone())),
        })
        .collect();

    let summary = summarize(&historical_data, repo.data_source(), repo.last_updated());

    Ok(SurgeReport {
        summary,
        historical_data,
        prediction_notes: PREDICTION_NOTES.iter().map(|n| n.to_string()).collect(),
    })
}

fn restrict_to_category(record: &MonthRecord, category: &str) -> Option<MonthRecord> {
    let surge_entries: Vec<_> = record
        .surge_entries
        .iter()
        .filter(|e| e.disease_category == category)
        .cloned()
        .collect();

    if surge_entries.is_empty() {
        return None;
    }

    Some(MonthRecord {
        month_name: record.month_name.clone(),
        festivals: record.festivals.clone(),
        average_air_quality_index: record.average_air_quality_index,
        baseline_patient_count: record.baseline_patient_count,
        surge_entries,
        total_surge_patients: record.total_surge_patients,
        notes: record.notes.clone(),
    })
}

fn summarize(
    data: &BTreeMap<u8, MonthRecord>,
    data_source: &str,
    last_updated: &str,
) -> SurgeSummary {
    // Ties keep the earliest month.
    let busiest = data.values().reduce(|best, record| {
        if record.total_surge_patients > best.total_surge_patients {
            record
        } else {
            best
        }
    });

    let critical_alert_months = data
        .values()
        .filter(|r| r.total_surge_patients > CRITICAL_SURGE_THRESHOLD)
        .map(|r| r.month_name.clone())
        .collect();

    SurgeSummary {
        total_months_analyzed: data.len(),
        highest_surge_month: busiest.map(|r| r.month_name.clone()),
        highest_surge_count: busiest.map(|r| r.total_surge_patients),
        critical_alert_months,
        data_source: data_source.to_string(),
        last_updated: last_updated.to_string(),
    }
}

/// Accepts `11`, `11.0` or `"11"` for the month. Models are not always
/// careful about argument types.
fn lenient_month<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum MonthArg {
        Int(i64),
        Float(f64),
        Text(String),
    }

    match Option::<MonthArg>::deserialize(deserializer)? {
        None => Ok(None),
        Some(MonthArg::Int(n)) => Ok(Some(n)),
        Some(MonthArg::Float(f)) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            Ok(Some(f as i64))
        }
        Some(MonthArg::Float(f)) => Err(de::Error::custom(format!(
            "month must be an integer, got {}",
            f
        ))),
        Some(MonthArg::Text(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("month must be an integer, got {:?}", s))),
    }
}

/// Exposes [`query_surge_data`] as a stdio tool.
pub struct HistoricalSurgeTool<R> {
    repo: R,
}

impl<R: SurgeDataRepository> HistoricalSurgeTool<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }
}

impl<R: SurgeDataRepository> Tool for HistoricalSurgeTool<R> {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn description(&self) -> &str {
        "Get historical seasonal patient-surge statistics for the hospital. \
         Optionally filter by month (1-12) and by disease category \
         (respiratory, gastro, infectious, accident, skin, heat_related, cardiac, or 'all'). \
         Returns a summary (busiest month, critical months above 1000 surge patients), \
         the matching monthly records and standing prediction notes."
    }

    fn input_schema(&self) -> Value {
        let categories = self.repo.categories().join(", ");
        json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "month": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": 12,
                    "description": "Month number (1 = January ... 12 = December). Omit for all months."
                },
                "disease_category": {
                    "type": "string",
                    "description": format!(
                        "Disease category to narrow the surge entries to ({}), or 'all'. Omit for all categories.",
                        categories
                    )
                }
            }
        })
    }

    fn call(&self, arguments: Value) -> Result<Value, CapabilityError> {
        let query: SurgeQuery = serde_json::from_value(arguments)
            .map_err(|e| CapabilityError::new(format!("Invalid arguments: {}", e)))?;

        let report =
            query_surge_data(&self.repo, &query).map_err(|e| CapabilityError::new(e.to_string()))?;

        tracing::debug!(
            months = report.summary.total_months_analyzed,
            critical = report.summary.critical_alert_months.len(),
            "surge query answered"
        );

        serde_json::to_value(&report)
            .map_err(|e| CapabilityError::new(format!("Failed to serialize report: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capability_common::surge::builtin;

    #[test]
    fn test_single_month_returns_one_entry() {
        for month in 1..=12 {
            let report = query_surge_data(builtin(), &SurgeQuery::for_month(month)).unwrap();
            let keys: Vec<u8> = report.historical_data.keys().copied().collect();
            assert_eq!(keys, vec![month as u8]);
            assert_eq!(report.summary.total_months_analyzed, 1);
        }
    }

    #[test]
    fn test_november_scenario() {
        let report = query_surge_data(builtin(), &SurgeQuery::for_month(11)).unwrap();
        let nov = &report.historical_data[&11];
        assert_eq!(nov.month_name, "November");
        assert_eq!(nov.total_surge_patients, 1940);
        assert_eq!(report.summary.highest_surge_month.as_deref(), Some("November"));
        assert_eq!(report.summary.highest_surge_count, Some(1940));
        assert_eq!(report.summary.critical_alert_months, vec!["November"]);
    }

    #[test]
    fn test_out_of_range_months_are_rejected() {
        for month in [0, 13, -1, 300, i64::MAX] {
            let err = query_surge_data(builtin(), &SurgeQuery::for_month(month)).unwrap_err();
            assert_eq!(err, SurgeQueryError::InvalidMonth(month));
        }
    }

    #[test]
    fn test_respiratory_filter_keeps_every_month() {
        let query = SurgeQuery::default().with_category("respiratory");
        let report = query_surge_data(builtin(), &query).unwrap();
        assert_eq!(report.historical_data.len(), 12);
        for record in report.historical_data.values() {
            assert!(!record.surge_entries.is_empty());
            assert!(record
                .surge_entries
                .iter()
                .all(|e| e.disease_category == "respiratory"));
        }
    }

    #[test]
    fn test_category_filter_drops_months_without_matches() {
        let query = SurgeQuery::default().with_category("cardiac");
        let report = query_surge_data(builtin(), &query).unwrap();
        let months: Vec<u8> = report.historical_data.keys().copied().collect();
        assert_eq!(months, vec![1, 2, 5, 11, 12]);
    }

    #[test]
    fn test_empty_result_has_null_maximum() {
        let query = SurgeQuery::for_month(6).with_category("cardiac");
        let report = query_surge_data(builtin(), &query).unwrap();
        assert!(report.historical_data.is_empty());
        assert_eq!(report.summary.total_months_analyzed, 0);
        assert_eq!(report.summary.highest_surge_month, None);
        assert_eq!(report.summary.highest_surge_count, None);
        assert!(report.summary.critical_alert_months.is_empty());
    }

    #[test]
    fn test_wildcard_matches_no_filter() {
        let unfiltered = query_surge_data(builtin(), &SurgeQuery::default()).unwrap();
        let wildcard =
            query_surge_data(builtin(), &SurgeQuery::default().with_category(ALL_CATEGORIES))
                .unwrap();
        assert_eq!(unfiltered, wildcard);
    }

    #[test]
    fn test_unknown_category_is_empty_not_error() {
        let query = SurgeQuery::default().with_category("Respiratory");
        let report = query_surge_data(builtin(), &query).unwrap();
        assert!(report.historical_data.is_empty());
    }

    #[test]
    fn test_full_year_summary() {
        let report = query_surge_data(builtin(), &SurgeQuery::default()).unwrap();
        let max = report
            .historical_data
            .values()
            .map(|r| r.total_surge_patients)
            .max();
        assert_eq!(report.summary.total_months_analyzed, 12);
        assert_eq!(report.summary.highest_surge_count, max);
        assert_eq!(report.summary.highest_surge_month.as_deref(), Some("November"));

        let expected: Vec<String> = report
            .historical_data
            .values()
            .filter(|r| r.total_surge_patients > CRITICAL_SURGE_THRESHOLD)
            .map(|r| r.month_name.clone())
            .collect();
        assert_eq!(report.summary.critical_alert_months, expected);
        // June sits exactly on the threshold.
        assert!(!expected.contains(&"June".to_string()));
    }

    #[test]
    fn test_tie_keeps_earliest_month() {
        let mut db = capability_common::SurgeDatabase::default_database();
        db.months.get_mut(&3).unwrap().total_surge_patients = 1940;
        let report = query_surge_data(&db, &SurgeQuery::default()).unwrap();
        assert_eq!(report.summary.highest_surge_month.as_deref(), Some("March"));
    }

    #[test]
    fn test_filter_does_not_touch_source() {
        let before = builtin().clone();
        let query = SurgeQuery::default().with_category("gastro");
        query_surge_data(builtin(), &query).unwrap();
        assert_eq!(&before, builtin());
    }

    #[test]
    fn test_query_is_idempotent() {
        let query = SurgeQuery::for_month(7).with_category("infectious");
        let first = query_surge_data(builtin(), &query).unwrap();
        let second = query_surge_data(builtin(), &query).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_lenient_month_parsing() {
        let query: SurgeQuery = serde_json::from_value(json!({ "month": "11" })).unwrap();
        assert_eq!(query.month, Some(11));
        let query: SurgeQuery = serde_json::from_value(json!({ "month": 4.0 })).unwrap();
        assert_eq!(query.month, Some(4));
        let query: SurgeQuery = serde_json::from_value(json!({ "month": null })).unwrap();
        assert_eq!(query.month, None);
        assert!(serde_json::from_value::<SurgeQuery>(json!({ "month": "march" })).is_err());
        assert!(serde_json::from_value::<SurgeQuery>(json!({ "month": 2.5 })).is_err());
    }

    #[test]
    fn test_tool_error_body_has_no_data_keys() {
        let tool = HistoricalSurgeTool::new(builtin());
        let err = tool.call(json!({ "month": 13 })).unwrap_err();
        assert_eq!(err.error, "Invalid month: 13. Month must be between 1 and 12.");
    }

    #[test]
    fn test_misspelt_filter_is_rejected() {
        let tool = HistoricalSurgeTool::new(builtin());
        let err = tool.call(json!({ "months": 6 })).unwrap_err();
        assert!(err.error.starts_with("Invalid arguments"), "{}", err.error);
        assert!(err.error.contains("months"), "{}", err.error);

        assert!(tool.call(json!({})).is_ok());
    }

    #[test]
    fn test_schema_lists_known_categories() {
        let schema = HistoricalSurgeTool::new(builtin()).input_schema();
        let description = schema["properties"]["disease_category"]["description"]
            .as_str()
            .unwrap();
        for category in ["respiratory", "heat_related", "cardiac"] {
            assert!(description.contains(category), "{}", description);
        }
        assert_eq!(schema["additionalProperties"], false);
    }
}
