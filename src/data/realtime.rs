//! Aggregates over realtime reports.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use ga4_types::Row;

use super::{is_set, EventCounts, Tally};

/// Events that count as a conversion in deal activity.
pub const CONVERSION_EVENTS: [&str; 2] = ["click_external_deal", "conversion"];

/// Site-wide activity from a realtime report with dimensions
/// `eventName, country, deviceCategory, pagePath, pageTitle` and metrics
/// `activeUsers, eventCount`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RealtimeActivity {
    pub active_users: u64,
    pub total_events: u64,
    pub events: EventCounts,
    /// Active users per country.
    pub countries: Tally,
    /// Active users per device category.
    pub devices: Tally,
    /// Events per page path.
    pub pages: Tally,
}

impl RealtimeActivity {
    pub fn from_rows(rows: &[Row]) -> Self {
        let mut activity = Self::default();

        for row in rows {
            let users = row.metric_u64(0);
            let events = row.metric_u64(1);

            activity.active_users += users;
            activity.total_events += events;
            activity.events.add(row.dimension(0), events);
            activity.countries.add(row.dimension(1), users);
            activity.devices.add(row.dimension(2), users);
            activity.pages.add(row.dimension(3), events);
        }

        activity
    }
}

/// A conversion observed in deal activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversion {
    pub deal_id: String,
    pub category: String,
    pub partner: String,
    pub event: String,
    pub click_id: String,
    pub count: u64,
}

/// Per-deal activity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DealSummary {
    pub category: String,
    pub partner: String,
    pub events: EventCounts,
    pub total_events: u64,
}

/// Deal-level activity from a realtime report with dimensions
/// `eventName, customEvent:deal_id, customEvent:deal_category,
/// customEvent:partner, customEvent:click_id` and metrics
/// `eventCount, activeUsers`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DealActivity {
    pub deals: BTreeMap<String, DealSummary>,
    pub conversions: Vec<Conversion>,
    #[serde(default)]
    pub total_deals: usize,
    #[serde(default)]
    pub total_conversions: usize,
}

impl DealActivity {
    pub fn from_rows(rows: &[Row]) -> Self {
        let mut activity = Self::default();

        for row in rows {
            let event = row.dimension(0);
            let deal_id = row.dimension(1);
            if !is_set(deal_id) {
                continue;
            }

            let category = row.dimension(2);
            let partner = row.dimension(3);
            let count = row.metric_u64(0);

            let deal = activity
                .deals
                .entry(deal_id.to_string())
                .or_insert_with(|| DealSummary {
                    category: category.to_string(),
                    partner: partner.to_string(),
                    ..Default::default()
                });
            deal.events.add(event, count);
            deal.total_events += count;

            if CONVERSION_EVENTS.contains(&event) {
                activity.conversions.push(Conversion {
                    deal_id: deal_id.to_string(),
                    category: category.to_string(),
                    partner: partner.to_string(),
                    event: event.to_string(),
                    click_id: row.dimension(4).to_string(),
                    count,
                });
            }
        }

        activity.total_deals = activity.deals.len();
        activity.total_conversions = activity.conversions.len();
        activity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_realtime_activity_aggregates() {
        let rows = vec![
            Row::new(["page_view", "US", "mobile", "/", "Home"], ["3", "10"]),
            Row::new(["page_view", "CA", "desktop", "/deal/x", "X"], ["1", "2"]),
            Row::new(["view_item", "US", "mobile", "/deal/x", "X"], ["2", "4"]),
        ];

        let activity = RealtimeActivity::from_rows(&rows);
        assert_eq!(activity.active_users, 6);
        assert_eq!(activity.total_events, 16);
        assert_eq!(activity.events.get("page_view"), 12);
        assert_eq!(activity.countries.get("US"), 5);
        assert_eq!(activity.devices.get("desktop"), 1);
        assert_eq!(activity.pages.get("/deal/x"), 6);
        assert_eq!(activity.events.total(), activity.total_events);
    }

    #[test]
    fn test_deal_activity_skips_unset_deals() {
        let rows = vec![
            Row::new(["view_item", "deal-1", "spa", "acme", ""], ["5", "2"]),
            Row::new(["click_external_deal", "deal-1", "spa", "acme", "c-9"], ["2", "1"]),
            Row::new(["view_item", "(not set)", "", "", ""], ["50", "20"]),
            Row::new(["conversion", "", "", "", ""], ["1", "1"]),
            Row::new(["conversion", "deal-2", "food", "bistro", "c-1"], ["1", "1"]),
        ];

        let activity = DealActivity::from_rows(&rows);
        assert_eq!(activity.total_deals, 2);
        assert_eq!(activity.deals["deal-1"].total_events, 7);
        assert_eq!(activity.deals["deal-1"].events.get("click_external_deal"), 2);
        assert_eq!(activity.total_conversions, 2);
        assert_eq!(activity.conversions[0].click_id, "c-9");
        assert_eq!(activity.conversions[1].partner, "bistro");

        let json = serde_json::to_value(&activity).unwrap();
        assert_eq!(json["total_deals"], 2);
        assert_eq!(json["total_conversions"], 2);
    }
}
