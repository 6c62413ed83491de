//! Cleaning rules for the raw vacancy export.
//!
//! The rules run in a fixed order, each one either filtering rows or recoding
//! a column (often both). Accepted-value lists, caps and the ISCO placeholder
//! are held in [`CleaningRules`] so they can be changed from configuration.

use chrono::Datelike;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::domain::{column_text, ORGANIZATION_LOCATION_COLUMN};
use crate::error::Result;
use crate::parsing::dates::{format_date, parse_date};
use crate::transformations::filtering::{
    drop_missing, drop_singleton_values, exclude_by_column, filter_by_column, Filtered,
};
use crate::transformations::projection::require_columns;

pub const DURATION_COLUMN: &str = "duration";
pub const LOG_DURATION_COLUMN: &str = "log_duration";
pub const POSTING_COUNT_COLUMN: &str = "posting_count";
pub const CONTRACT_TYPE_COLUMN: &str = "contract_type_label";
pub const CONTRACT_CLUSTER_COLUMN: &str = "contract_type_label_cluster";
pub const WORKING_HOURS_COLUMN: &str = "working_hours_type_label";
pub const SALARY_COLUMN: &str = "salary";
pub const SALARY_DUMMY_COLUMN: &str = "salary_dummy";
pub const ADVERTISER_TYPE_COLUMN: &str = "advertiser_type_label";
pub const ISCO_CODE_COLUMN: &str = "profession_isco_code_value";
pub const ISCO_AGG_1_COLUMN: &str = "profession_isco_code_value_agg_1";
pub const ISCO_AGG_2_COLUMN: &str = "profession_isco_code_value_agg_2";
pub const JOB_ID_COLUMN: &str = "job_id";
pub const ORGANIZATION_ID_COLUMN: &str = "organization_ID";
pub const INDUSTRY_COLUMN: &str = "organization_industry_label";
pub const LANGUAGE_COLUMN: &str = "language";
pub const LANGUAGE_CLUSTER_COLUMN: &str = "Applicant_language_cluster";
pub const EDUCATION_COLUMN: &str = "education_level_label";
pub const EDUCATION_CLUSTER_COLUMN: &str = "education_level_cluster";
pub const DATE_COLUMN: &str = "date";
pub const QUARTER_COLUMN: &str = "quarter_of_date";
pub const MONTH_COLUMN: &str = "month_of_date";
pub const FIRM_SIZE_COLUMN: &str = "organization_size_label";

/// Columns the cleaning rules read.
pub const CLEANING_INPUT_COLUMNS: [&str; 14] = [
    DURATION_COLUMN,
    POSTING_COUNT_COLUMN,
    CONTRACT_TYPE_COLUMN,
    WORKING_HOURS_COLUMN,
    SALARY_COLUMN,
    ADVERTISER_TYPE_COLUMN,
    ISCO_CODE_COLUMN,
    JOB_ID_COLUMN,
    ORGANIZATION_ID_COLUMN,
    INDUSTRY_COLUMN,
    LANGUAGE_COLUMN,
    EDUCATION_COLUMN,
    DATE_COLUMN,
    FIRM_SIZE_COLUMN,
];

/// Columns the cleaning rules add.
pub const CLEANING_DERIVED_COLUMNS: [&str; 9] = [
    LOG_DURATION_COLUMN,
    CONTRACT_CLUSTER_COLUMN,
    SALARY_DUMMY_COLUMN,
    LANGUAGE_CLUSTER_COLUMN,
    EDUCATION_CLUSTER_COLUMN,
    QUARTER_COLUMN,
    MONTH_COLUMN,
    ISCO_AGG_1_COLUMN,
    ISCO_AGG_2_COLUMN,
];

const PERMANENT: &str = "Permanent";
const NON_PERMANENT: &str = "Non_Permanent";
const GERMAN: &str = "German";
const INTERNATIONAL: &str = "International";
const UNIVERSITY_DEGREE: &str = "University degree";
const NON_UNIVERSITY_DEGREE: &str = "Non university degree";

/// Thresholds and value lists used by [`clean_vacancies`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningRules {
    /// Drop rows whose raw organization location occurs only once
    pub drop_singleton_names: bool,
    /// Durations above this are capped
    pub duration_cap: f64,
    /// Posting counts above this are capped
    pub posting_count_cap: f64,
    pub accepted_contract_types: Vec<String>,
    /// Subset of the accepted contract types clustered as `Permanent`
    pub permanent_contract_types: Vec<String>,
    pub working_hours_type: String,
    pub advertiser_type: String,
    pub accepted_languages: Vec<String>,
    /// Language code clustered as `German`
    pub home_language: String,
    pub excluded_education_levels: Vec<String>,
    pub university_education_levels: Vec<String>,
    pub accepted_firm_sizes: Vec<String>,
    /// ISCO code used by the export for "no profession"
    pub isco_placeholder: f64,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl Default for CleaningRules {
    fn default() -> Self {
        Self {
            drop_singleton_names: true,
            duration_cap: 365.0,
            posting_count_cap: 20.0,
            accepted_contract_types: strings(&[
                "Permanent contract",
                "Internship / Graduation position",
                "Possibly permanent contract",
                "Apprenticeship",
                "Temporary contract",
                "Secondment / Interim",
            ]),
            permanent_contract_types: strings(&[
                "Permanent contract",
                "Internship / Graduation position",
                "Possibly permanent contract",
            ]),
            working_hours_type: "Regular working hours".to_string(),
            advertiser_type: "Direct employer".to_string(),
            accepted_languages: strings(&[
                "de", "en", "zh", "fr", "cs", "es", "nl", "hu", "sv", "no", "da", "sk", "ru",
                "pl", "pt", "it", "ro", "ja", "el",
            ]),
            home_language: "de".to_string(),
            excluded_education_levels: strings(&["Unbekannt", "Grundschule"]),
            university_education_levels: strings(&["Bachelor", "Master", "Dissertation"]),
            accepted_firm_sizes: strings(&["5000+", "1000-4999", "500-999"]),
            isco_placeholder: 9_999_999_999.0,
        }
    }
}

/// Rows removed by one cleaning rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleaningStep {
    pub rule: String,
    pub dropped: usize,
}

/// Per-rule drop counts of a cleaning run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleaningSummary {
    pub input_records: usize,
    pub steps: Vec<CleaningStep>,
    pub output_records: usize,
}

impl CleaningSummary {
    fn record(&mut self, rule: &str, filtered: Filtered) -> DataFrame {
        if let Some(step) = self.steps.iter_mut().find(|s| s.rule == rule) {
            step.dropped += filtered.dropped;
        } else {
            self.steps.push(CleaningStep {
                rule: rule.to_string(),
                dropped: filtered.dropped,
            });
        }
        filtered.kept
    }

    /// Rows dropped by `rule`, zero if the rule did not run.
    pub fn dropped_by(&self, rule: &str) -> usize {
        self.steps
            .iter()
            .find(|s| s.rule == rule)
            .map_or(0, |s| s.dropped)
    }

    pub fn total_dropped(&self) -> usize {
        self.steps.iter().map(|s| s.dropped).sum()
    }
}

/// Apply every cleaning rule to `df`, in order.
///
/// Fails with `MissingRequiredColumn` before touching any row if a column a
/// rule reads is absent from the header.
pub fn clean_vacancies(
    df: DataFrame,
    rules: &CleaningRules,
) -> Result<(DataFrame, CleaningSummary)> {
    if rules.drop_singleton_names {
        require_columns(&df, &[ORGANIZATION_LOCATION_COLUMN])?;
    }
    require_columns(&df, &CLEANING_INPUT_COLUMNS)?;

    let mut summary = CleaningSummary {
        input_records: df.height(),
        ..CleaningSummary::default()
    };
    let mut df = df;

    if rules.drop_singleton_names {
        df = summary.record(
            "singleton_location_names",
            drop_singleton_values(df, ORGANIZATION_LOCATION_COLUMN)?,
        );
    }

    // Duration and posting count: numeric, top-coded
    df = coerce_numeric(df, DURATION_COLUMN)?;
    df = summary.record("duration", drop_missing(df, DURATION_COLUMN)?);
    df = cap(df, DURATION_COLUMN, rules.duration_cap)?;
    let log_durations: Vec<Option<f64>> = df
        .column(DURATION_COLUMN)?
        .f64()?
        .into_iter()
        .map(|duration| duration.map(f64::ln))
        .collect();
    df.with_column(Series::new(LOG_DURATION_COLUMN.into(), log_durations))?;

    df = coerce_numeric(df, POSTING_COUNT_COLUMN)?;
    df = summary.record("posting_count", drop_missing(df, POSTING_COUNT_COLUMN)?);
    df = cap(df, POSTING_COUNT_COLUMN, rules.posting_count_cap)?;

    // Contract type and working hours
    df = summary.record(
        "contract_type",
        filter_by_column(df, CONTRACT_TYPE_COLUMN, &rules.accepted_contract_types)?,
    );
    df = cluster_by_membership(
        df,
        CONTRACT_TYPE_COLUMN,
        CONTRACT_CLUSTER_COLUMN,
        &rules.permanent_contract_types,
        (PERMANENT, NON_PERMANENT),
    )?;
    df = summary.record(
        "working_hours",
        filter_by_column(
            df,
            WORKING_HOURS_COLUMN,
            std::slice::from_ref(&rules.working_hours_type),
        )?,
    );

    df = df
        .lazy()
        .with_column(col(SALARY_COLUMN).is_not_null().alias(SALARY_DUMMY_COLUMN))
        .collect()?;

    df = summary.record(
        "advertiser_type",
        filter_by_column(
            df,
            ADVERTISER_TYPE_COLUMN,
            std::slice::from_ref(&rules.advertiser_type),
        )?,
    );

    // Identifier columns must be present; unparseable values become null
    for (rule, column) in [
        ("profession_code", ISCO_CODE_COLUMN),
        ("job_id", JOB_ID_COLUMN),
        ("organization_id", ORGANIZATION_ID_COLUMN),
    ] {
        df = summary.record(rule, drop_missing(df, column)?);
        df = coerce_numeric(df, column)?;
    }

    df = summary.record("industry", drop_missing(df, INDUSTRY_COLUMN)?);

    df = summary.record(
        "language",
        filter_by_column(df, LANGUAGE_COLUMN, &rules.accepted_languages)?,
    );
    df = cluster_by_membership(
        df,
        LANGUAGE_COLUMN,
        LANGUAGE_CLUSTER_COLUMN,
        std::slice::from_ref(&rules.home_language),
        (GERMAN, INTERNATIONAL),
    )?;

    df = summary.record(
        "education_level",
        exclude_by_column(df, EDUCATION_COLUMN, &rules.excluded_education_levels)?,
    );
    df = cluster_by_membership(
        df,
        EDUCATION_COLUMN,
        EDUCATION_CLUSTER_COLUMN,
        &rules.university_education_levels,
        (UNIVERSITY_DEGREE, NON_UNIVERSITY_DEGREE),
    )?;

    df = recode_dates(df)?;

    df = summary.record(
        "firm_size",
        filter_by_column(df, FIRM_SIZE_COLUMN, &rules.accepted_firm_sizes)?,
    );

    df = coerce_numeric(df, ISCO_CODE_COLUMN)?;
    df = summary.record(
        "isco_placeholder",
        Filtered::by_expr(
            df,
            col(ISCO_CODE_COLUMN)
                .neq(lit(rules.isco_placeholder))
                .or(col(ISCO_CODE_COLUMN).is_null()),
        )?,
    );
    df = aggregate_isco_codes(df)?;

    summary.output_records = df.height();
    log::info!(
        "Cleaning: {} -> {} records",
        summary.input_records,
        summary.output_records
    );
    for step in &summary.steps {
        log::debug!("  {}: dropped {}", step.rule, step.dropped);
    }

    Ok((df, summary))
}

/// Cast `column` to Float64; cells that do not parse become null.
fn coerce_numeric(df: DataFrame, column: &str) -> Result<DataFrame> {
    Ok(df
        .lazy()
        .with_column(col(column).cast(DataType::Float64))
        .collect()?)
}

fn cap(df: DataFrame, column: &str, limit: f64) -> Result<DataFrame> {
    Ok(df
        .lazy()
        .with_column(
            when(col(column).gt(lit(limit)))
                .then(lit(limit))
                .otherwise(col(column))
                .alias(column),
        )
        .collect()?)
}

/// Write `labels.0` into `target` where `source` is one of `members`,
/// `labels.1` everywhere else (nulls included).
fn cluster_by_membership(
    mut df: DataFrame,
    source: &str,
    target: &str,
    members: &[String],
    labels: (&str, &str),
) -> Result<DataFrame> {
    let (inside, outside) = labels;
    let clusters: Vec<&str> = column_text(&df, source)?
        .iter()
        .map(|value| {
            if value.as_deref().is_some_and(|v| members.iter().any(|m| m == v)) {
                inside
            } else {
                outside
            }
        })
        .collect();
    df.with_column(Series::new(target.into(), clusters))?;
    Ok(df)
}

/// Rewrite `date` as ISO text and add quarter and month. Unparseable dates
/// null all three.
fn recode_dates(mut df: DataFrame) -> Result<DataFrame> {
    let parsed: Vec<_> = column_text(&df, DATE_COLUMN)?
        .iter()
        .map(|value| value.as_deref().and_then(parse_date))
        .collect();

    let dates: Vec<Option<String>> = parsed.iter().map(|d| d.as_ref().map(format_date)).collect();
    let quarters: Vec<Option<u32>> = parsed
        .iter()
        .map(|d| d.as_ref().map(|d| (d.month() - 1) / 3 + 1))
        .collect();
    let months: Vec<Option<u32>> = parsed.iter().map(|d| d.as_ref().map(|d| d.month())).collect();

    df.with_column(Series::new(DATE_COLUMN.into(), dates))?;
    df.with_column(Series::new(QUARTER_COLUMN.into(), quarters))?;
    df.with_column(Series::new(MONTH_COLUMN.into(), months))?;
    Ok(df)
}

fn aggregate_isco_codes(mut df: DataFrame) -> Result<DataFrame> {
    let codes: Vec<Option<f64>> = df.column(ISCO_CODE_COLUMN)?.f64()?.into_iter().collect();
    let major: Vec<Option<i64>> = codes
        .iter()
        .map(|c| c.and_then(|c| leading_digits(c, 3)))
        .collect();
    let sub_major: Vec<Option<i64>> = codes
        .iter()
        .map(|c| c.and_then(|c| leading_digits(c, 2)))
        .collect();

    df.with_column(Series::new(ISCO_AGG_1_COLUMN.into(), major))?;
    df.with_column(Series::new(ISCO_AGG_2_COLUMN.into(), sub_major))?;
    Ok(df)
}

/// First `n` digits of the integer part of `code`.
fn leading_digits(code: f64, n: usize) -> Option<i64> {
    if !code.is_finite() {
        return None;
    }
    let digits: String = format!("{:.0}", code.trunc().abs()).chars().take(n).collect();
    digits.parse::<i64>().ok()
}
