//! Statistics-by-date result.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::null_as_default;

/// Submission counts for one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistic {
    /// Valid submissions.
    #[serde(default)]
    pub number_of_valid_submissions: u64,
    /// Submissions flagged as spam.
    #[serde(default)]
    pub number_of_spam_submissions: u64,
}

/// Totals and per-day counts over the requested range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticData {
    /// Valid submissions over the whole range.
    #[serde(default)]
    pub number_of_valid_submissions: u64,
    /// Spam submissions over the whole range.
    #[serde(default)]
    pub number_of_spam_submissions: u64,
    /// Counts per day.
    #[serde(default, deserialize_with = "null_as_default")]
    pub numbers_by_date: BTreeMap<NaiveDate, Statistic>,
}

/// Response of the statistics-by-date endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticResult {
    /// Whether the server produced statistics.
    #[serde(default, deserialize_with = "null_as_default")]
    pub result: bool,
    /// The statistics, absent on error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<StatisticData>,
    /// Whether the server rejected the request.
    #[serde(default, deserialize_with = "null_as_default")]
    pub error: bool,
    /// Message accompanying `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl StatisticResult {
    /// Whether the server flagged the request as erroneous.
    #[must_use]
    pub fn has_error(&self) -> bool {
        self.error
    }
}
