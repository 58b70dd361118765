//! Values for the wrapped recap screen.

use crate::records::AnalyticsItem;

/// Shown when no analytics item tracks days together.
pub const DEFAULT_DAYS_TOGETHER: &str = "730";

/// Days-together figure: the value of the first item whose title mentions
/// "days", in display order.
pub fn days_together(analytics: &[AnalyticsItem]) -> String {
    let mut items: Vec<&AnalyticsItem> = analytics.iter().collect();
    items.sort_by_key(|item| item.sort_order);
    items
        .into_iter()
        .find(|item| item.title.to_lowercase().contains("days"))
        .map(|item| item.value.trim())
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_DAYS_TOGETHER)
        .to_string()
}
