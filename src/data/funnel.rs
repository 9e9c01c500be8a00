//! Deal conversion funnel.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use ga4_types::Row;

use super::{percent, EventCounts};

/// Event count and user count for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventStats {
    pub events: u64,
    pub users: u64,
}

impl EventStats {
    /// Per-event stats from an `eventName × (eventCount, totalUsers)` report.
    pub fn from_rows(rows: &[Row]) -> BTreeMap<String, EventStats> {
        let mut stats: BTreeMap<String, EventStats> = BTreeMap::new();
        for row in rows {
            let entry = stats.entry(row.dimension(0).to_string()).or_default();
            entry.events += row.metric_u64(0);
            entry.users += row.metric_u64(1);
        }
        stats
    }
}

/// Deal page views → deal selections → outbound partner clicks.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Funnel {
    pub views: u64,
    pub selects: u64,
    pub clicks: u64,
}

impl Funnel {
    /// Read the funnel steps out of event counts. `select_event` differs
    /// between reports (`select_item` or `select_content`).
    pub fn from_events(events: &EventCounts, select_event: &str) -> Self {
        Self {
            views: events.get("view_item"),
            selects: events.get(select_event),
            clicks: events.get("click_external_deal"),
        }
    }

    /// Same as [`Funnel::from_events`] over per-event stats.
    pub fn from_stats(stats: &BTreeMap<String, EventStats>, select_event: &str) -> Self {
        let events = |name: &str| stats.get(name).map(|s| s.events).unwrap_or(0);
        Self {
            views: events("view_item"),
            selects: events(select_event),
            clicks: events("click_external_deal"),
        }
    }

    /// Selections per view, in percent. Zero when there were no views.
    pub fn click_rate(&self) -> f64 {
        percent(self.selects, self.views)
    }

    /// Partner clicks per view, in percent. Zero when there were no views.
    pub fn conversion_rate(&self) -> f64 {
        percent(self.clicks, self.views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rates() {
        let events: EventCounts = [
            ("view_item", 200u64),
            ("select_item", 30),
            ("click_external_deal", 3),
        ]
        .into_iter()
        .collect();

        let funnel = Funnel::from_events(&events, "select_item");
        assert_eq!(funnel.views, 200);
        assert!((funnel.click_rate() - 15.0).abs() < 1e-9);
        assert!((funnel.conversion_rate() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_from_stats() {
        let rows = vec![
            Row::new(["view_item"], ["40", "10"]),
            Row::new(["view_item"], ["10", "5"]),
            Row::new(["select_content"], ["5", "4"]),
        ];
        let stats = EventStats::from_rows(&rows);
        assert_eq!(stats["view_item"], EventStats { events: 50, users: 15 });

        let funnel = Funnel::from_stats(&stats, "select_content");
        assert_eq!(funnel.selects, 5);
        assert!((funnel.click_rate() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_views_gives_zero_rates() {
        let events: EventCounts = [("click_external_deal", 4u64)].into_iter().collect();
        let funnel = Funnel::from_events(&events, "select_content");
        assert_eq!(funnel.click_rate(), 0.0);
        assert_eq!(funnel.conversion_rate(), 0.0);
    }
}
