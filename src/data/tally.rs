//! Keyed counters built from report rows.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use ga4_types::Row;

/// A count per key (event name, country, page, ...).
///
/// Keys are kept sorted so serialized output is stable between runs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tally(BTreeMap<String, u64>);

/// Event name → event count.
pub type EventCounts = Tally;

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum the metric at `metric` per value of the dimension at `dimension`.
    ///
    /// Rows that repeat a key are added together, never overwritten.
    pub fn from_rows(rows: &[Row], dimension: usize, metric: usize) -> Self {
        let mut tally = Self::new();
        for row in rows {
            tally.add(row.dimension(dimension), row.metric_u64(metric));
        }
        tally
    }

    pub fn add(&mut self, key: impl Into<String>, count: u64) {
        *self.0.entry(key.into()).or_insert(0) += count;
    }

    /// Merge another tally into this one.
    pub fn extend(&mut self, other: &Tally) {
        for (key, count) in other.iter() {
            self.add(key, count);
        }
    }

    /// Count for `key`, zero if absent.
    pub fn get(&self, key: &str) -> u64 {
        self.0.get(key).copied().unwrap_or(0)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// The `n` largest entries, by count descending then key ascending.
    pub fn top(&self, n: usize) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&str, u64)> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries.truncate(n);
        entries
    }

    /// Which of `expected` have no entry.
    pub fn missing<'a>(&self, expected: &[&'a str]) -> Vec<&'a str> {
        expected
            .iter()
            .copied()
            .filter(|name| !self.contains(name))
            .collect()
    }
}

impl<K: Into<String>> FromIterator<(K, u64)> for Tally {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        let mut tally = Tally::new();
        for (key, count) in iter {
            tally.add(key, count);
        }
        tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<Row> {
        vec![
            Row::new(["page_view", "US"], ["120"]),
            Row::new(["view_item", "US"], ["40"]),
            Row::new(["page_view", "CA"], ["30"]),
            Row::new(["scroll", "US"], ["40"]),
        ]
    }

    #[test]
    fn test_from_rows_sums_duplicate_keys() {
        let counts = EventCounts::from_rows(&rows(), 0, 0);
        assert_eq!(counts.get("page_view"), 150);
        assert_eq!(counts.get("missing"), 0);
        assert_eq!(counts.len(), 3);
    }

    #[test]
    fn test_total_equals_sum_of_rows() {
        let rows = rows();
        let counts = EventCounts::from_rows(&rows, 0, 0);
        let row_sum: u64 = rows.iter().map(|r| r.metric_u64(0)).sum();
        assert_eq!(counts.total(), row_sum);

        let by_country = Tally::from_rows(&rows, 1, 0);
        assert_eq!(by_country.total(), row_sum);
    }

    #[test]
    fn test_top_orders_by_count_then_name() {
        let counts = EventCounts::from_rows(&rows(), 0, 0);
        assert_eq!(
            counts.top(3),
            vec![("page_view", 150), ("scroll", 40), ("view_item", 40)]
        );
        assert_eq!(counts.top(1).len(), 1);
    }

    #[test]
    fn test_missing() {
        let counts: EventCounts = [("page_view", 1u64), ("conversion", 2)].into_iter().collect();
        assert_eq!(
            counts.missing(&["page_view", "view_item", "conversion", "share"]),
            vec!["view_item", "share"]
        );
    }

    #[test]
    fn test_extend_and_serialize() {
        let mut a: Tally = [("x", 1u64)].into_iter().collect();
        let b: Tally = [("x", 2u64), ("y", 5)].into_iter().collect();
        a.extend(&b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            r#"{"x":3,"y":5}"#
        );
    }
}
