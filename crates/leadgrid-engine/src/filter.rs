use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use leadgrid_types::CellValue;
use serde::{Deserialize, Serialize};

/// Per-column filter predicate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum Predicate {
    #[default]
    Any,
    Equals(String),
    OneOf(Vec<String>),
    Contains(String),
    /// Half-open range `from <= d < to`; a missing bound is unbounded
    DateRange {
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    },
}

impl Predicate {
    pub fn equals(value: impl Into<String>) -> Self {
        Predicate::Equals(value.into())
    }

    pub fn contains(text: impl Into<String>) -> Self {
        Predicate::Contains(text.into())
    }

    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Predicate::OneOf(values.into_iter().map(Into::into).collect())
    }

    /// Date range for a preset relative to `now`.
    pub fn within(preset: DateRangePreset, now: DateTime<Utc>) -> Self {
        let (from, to) = preset.bounds(now);
        Predicate::DateRange {
            from: Some(from),
            to: Some(to),
        }
    }

    /// A predicate that excludes nothing is inactive.
    pub fn is_active(&self) -> bool {
        match self {
            Predicate::Any => false,
            Predicate::Equals(v) => !v.is_empty(),
            Predicate::OneOf(values) => !values.is_empty(),
            Predicate::Contains(text) => !text.is_empty(),
            Predicate::DateRange { from, to } => from.is_some() || to.is_some(),
        }
    }

    pub fn matches(&self, value: &CellValue) -> bool {
        if !self.is_active() {
            return true;
        }
        match self {
            Predicate::Any => true,
            Predicate::Equals(expected) => value_equals(value, expected),
            Predicate::OneOf(options) => options.iter().any(|o| value_equals(value, o)),
            Predicate::Contains(text) => {
                let needle = text.to_lowercase();
                match value {
                    CellValue::List(items) => {
                        items.iter().any(|i| i.to_lowercase().contains(&needle))
                    }
                    CellValue::Null => false,
                    other => other.display().to_lowercase().contains(&needle),
                }
            }
            Predicate::DateRange { from, to } => match value.as_date() {
                Some(date) => {
                    from.is_none_or(|from| from <= date) && to.is_none_or(|to| date < to)
                }
                None => false,
            },
        }
    }

    /// Human label of the predicate's value, used for filter chips.
    pub fn describe(&self) -> String {
        match self {
            Predicate::Any => String::new(),
            Predicate::Equals(v) | Predicate::Contains(v) => v.clone(),
            Predicate::OneOf(values) => values.join(", "),
            Predicate::DateRange { from, to } => {
                let fmt = |d: &Option<DateTime<Utc>>| {
                    d.map(|d| d.format("%Y-%m-%d").to_string())
                        .unwrap_or_else(|| "…".to_string())
                };
                format!("{} – {}", fmt(from), fmt(to))
            }
        }
    }
}

fn value_equals(value: &CellValue, expected: &str) -> bool {
    let expected = expected.to_lowercase();
    match value {
        CellValue::Null => false,
        CellValue::List(items) => items.iter().any(|i| i.to_lowercase() == expected),
        other => other.display().to_lowercase() == expected,
    }
}

/// Relative date windows offered by the "date range" filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateRangePreset {
    Today,
    Yesterday,
    Last7Days,
    Last30Days,
    ThisMonth,
    LastMonth,
}

impl DateRangePreset {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "today" => Some(Self::Today),
            "yesterday" => Some(Self::Yesterday),
            "last-7-days" => Some(Self::Last7Days),
            "last-30-days" => Some(Self::Last30Days),
            "this-month" => Some(Self::ThisMonth),
            "last-month" => Some(Self::LastMonth),
            _ => None,
        }
    }

    /// Half-open `[from, to)` bounds in UTC days.
    pub fn bounds(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let today = start_of_day(now);
        let tomorrow = today + Duration::days(1);
        match self {
            Self::Today => (today, tomorrow),
            Self::Yesterday => (today - Duration::days(1), today),
            Self::Last7Days => (today - Duration::days(6), tomorrow),
            Self::Last30Days => (today - Duration::days(29), tomorrow),
            Self::ThisMonth => {
                let first = month_start(now.year(), now.month()).unwrap_or(today);
                (first, tomorrow)
            }
            Self::LastMonth => {
                let this_first = month_start(now.year(), now.month()).unwrap_or(today);
                let (y, m) = if now.month() == 1 {
                    (now.year() - 1, 12)
                } else {
                    (now.year(), now.month() - 1)
                };
                let last_first = month_start(y, m).unwrap_or(this_first);
                (last_first, this_first)
            }
        }
    }
}

fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), now.month(), now.day(), 0, 0, 0)
        .single()
        .unwrap_or(now)
}

fn month_start(year: i32, month: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).single()
}

/// Global search text plus per-column predicates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    pub global_text: String,
    pub predicates: BTreeMap<String, Predicate>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.global_text = text.into();
        self
    }

    pub fn with(mut self, column_id: impl Into<String>, predicate: Predicate) -> Self {
        self.set(column_id, predicate);
        self
    }

    /// Set a predicate; an inactive predicate removes the column's entry.
    pub fn set(&mut self, column_id: impl Into<String>, predicate: Predicate) {
        let column_id = column_id.into();
        if predicate.is_active() {
            self.predicates.insert(column_id, predicate);
        } else {
            self.predicates.remove(&column_id);
        }
    }

    pub fn remove(&mut self, column_id: &str) -> bool {
        self.predicates.remove(column_id).is_some()
    }

    pub fn clear(&mut self) {
        self.global_text.clear();
        self.predicates.clear();
    }

    pub fn active_count(&self) -> usize {
        self.predicates.values().filter(|p| p.is_active()).count()
    }

    pub fn has_search(&self) -> bool {
        !self.global_text.trim().is_empty()
    }

    /// True when either search text or any predicate narrows the rows.
    pub fn is_filtering(&self) -> bool {
        self.has_search() || self.active_count() > 0
    }

    /// Active predicates in column-id order.
    pub fn active(&self) -> impl Iterator<Item = (&str, &Predicate)> {
        self.predicates
            .iter()
            .filter(|(_, p)| p.is_active())
            .map(|(id, p)| (id.as_str(), p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_equals_is_case_insensitive_and_matches_list_elements() {
        let p = Predicate::equals("Website");
        assert!(p.matches(&"website".into()));
        assert!(p.matches(&CellValue::List(vec!["ads".into(), "WEBSITE".into()])));
        assert!(!p.matches(&CellValue::Null));
        assert!(!p.matches(&"referral".into()));
    }

    #[test]
    fn test_empty_one_of_matches_everything() {
        let p = Predicate::OneOf(vec![]);
        assert!(!p.is_active());
        assert!(p.matches(&CellValue::Null));

        let p = Predicate::one_of(["initial", "won"]);
        assert!(p.matches(&"WON".into()));
        assert!(!p.matches(&"lost".into()));
    }

    #[test]
    fn test_date_range_is_half_open() {
        let p = Predicate::DateRange {
            from: Some(at(2025, 1, 1)),
            to: Some(at(2025, 1, 2)),
        };
        assert!(p.matches(&at(2025, 1, 1).into()));
        assert!(!p.matches(&at(2025, 1, 2).into()));
        assert!(!p.matches(&"2025-01-01".into()));
    }

    #[test]
    fn test_last_month_wraps_year() {
        let (from, to) = DateRangePreset::LastMonth.bounds(at(2025, 1, 15));
        assert_eq!(from.format("%Y-%m-%d").to_string(), "2024-12-01");
        assert_eq!(to.format("%Y-%m-%d").to_string(), "2025-01-01");
    }

    #[test]
    fn test_active_count_is_derived() {
        let mut filter = FilterState::new()
            .with("stage", Predicate::equals("initial"))
            .with("source", Predicate::Any);
        assert_eq!(filter.active_count(), 1);

        filter.set("stage", Predicate::Contains(String::new()));
        assert_eq!(filter.active_count(), 0);
        assert!(!filter.is_filtering());
    }
}
