//! 端末出力の整形

use arbitrage_common::{
    stop_lines, Coordinate, DiscoveryOutcome, GeocodedItem, HallmarkFinding, ListEntry, RoiResult,
    Selection, UserProfile,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub const NO_HALLMARK_MESSAGE: &str =
    "No specific hallmarks recognized, or the API returned an unexpected format.";
pub const NO_ITEMS_MESSAGE: &str = "No items discovered yet. Use `discover` to add some.";
pub const NO_ROUTE_CANDIDATES_MESSAGE: &str =
    "No items with address information available for routing.";

/// 通信中のスピナー
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn item_block(entry: &ListEntry) -> String {
    let mut lines = vec![
        format!("Item #{}  [{}] Score: {}", entry.id, entry.tier.as_str(), entry.score_label()),
        format!("  Reasoning: {}", entry.reasoning),
        format!("  Location:  {}", entry.location_label()),
    ];
    if let Some(link) = entry.maps_link() {
        lines.push(format!("  Map:       {}", link));
    }
    lines.push(format!("  Status:    {}", entry.status));
    lines.push(format!("  Listing:   {}", entry.url));
    if let Some(image) = &entry.image {
        lines.push(format!("  Image:     {}", image));
    }
    lines.join("\n")
}

pub fn items(entries: &[ListEntry]) -> String {
    if entries.is_empty() {
        return NO_ITEMS_MESSAGE.to_string();
    }
    entries.iter().map(item_block).collect::<Vec<_>>().join("\n\n")
}

pub fn outcome_line(outcome: &DiscoveryOutcome) -> String {
    let mark = if outcome.is_success() { "✔" } else { "✗" };
    format!("{} {}", mark, outcome.summary())
}

/// 候補一覧（選択済みには選択順の番号）
pub fn route_candidates(candidates: &[GeocodedItem], selection: &Selection) -> String {
    if candidates.is_empty() {
        return NO_ROUTE_CANDIDATES_MESSAGE.to_string();
    }
    candidates
        .iter()
        .map(|item| {
            let mark = selection
                .ids()
                .iter()
                .position(|id| *id == item.id)
                .map(|pos| format!("[{}]", pos + 1))
                .unwrap_or_else(|| "[ ]".to_string());
            format!("{} Item #{}: {}", mark, item.id, item.address)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn stops(stops: &[Coordinate]) -> String {
    stop_lines(stops).join("\n")
}

pub fn roi(result: &RoiResult) -> String {
    let verdict = if result.is_profitable() { "profit" } else { "loss" };
    [
        format!("Silver Melt Value: {}", result.melt_value_label()),
        format!("Potential Profit:  {} ({})", result.profit_label(), verdict),
        format!("ROI:               {}", result.roi_label()),
    ]
    .join("\n")
}

pub fn findings(findings: &[HallmarkFinding]) -> String {
    if findings.is_empty() {
        return NO_HALLMARK_MESSAGE.to_string();
    }
    findings
        .iter()
        .map(HallmarkFinding::summary)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn profile(user: &UserProfile) -> String {
    let mut lines = vec![format!("Username:  {}", user.username)];
    if let Some(email) = &user.email {
        lines.push(format!("Email:     {}", email));
    }
    if let Some(full_name) = &user.full_name {
        lines.push(format!("Full name: {}", full_name));
    }
    if user.disabled == Some(true) {
        lines.push("Account is disabled".to_string());
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbitrage_common::projection::NO_ROUTE_RETURNED_MESSAGE;
    use arbitrage_common::{list_projection, DiscoveredItem};

    #[test]
    fn test_item_block_without_location() {
        let item = DiscoveredItem {
            id: 4,
            url: "https://example.com/4".into(),
            status: "analyzed".into(),
            score: Some(8.5),
            ..Default::default()
        };
        let text = items(&list_projection(&[item]));
        assert!(text.contains("Item #4  [high] Score: 8.5 / 10"));
        assert!(text.contains("Location:  Not found"));
        assert!(!text.contains("Map:"));
    }

    #[test]
    fn test_route_candidates_marks_selection_order() {
        let candidates = vec![
            GeocodedItem { id: 1, url: String::new(), address: "A".into(), lat: 1.0, lng: 1.0 },
            GeocodedItem { id: 2, url: String::new(), address: "B".into(), lat: 2.0, lng: 2.0 },
        ];
        let selection: Selection = [2, 1].into_iter().collect();
        let text = route_candidates(&candidates, &selection);
        assert_eq!(text, "[2] Item #1: A\n[1] Item #2: B");
    }

    #[test]
    fn test_stops_format() {
        let text = stops(&[Coordinate { lat: 35.681236, lng: 139.767125 }]);
        assert_eq!(text, "Stop 1: Lat: 35.6812, Lng: 139.7671");
    }

    #[test]
    fn test_stops_empty_route() {
        assert_eq!(stops(&[]), NO_ROUTE_RETURNED_MESSAGE);
    }

    #[test]
    fn test_findings_empty() {
        assert_eq!(findings(&[]), NO_HALLMARK_MESSAGE);
    }
}
