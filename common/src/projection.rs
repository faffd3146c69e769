//! 画面ごとの射影
//!
//! 各画面はアイテム一覧を個別に取得し、ここの関数で自分用の形に変換する。
//! 画面間でキャッシュや同期はしない。

use crate::analysis::{parse_analysis, AnalysisPayload};
use crate::error::{Error, Result};
use crate::types::{Coordinate, DiscoveredItem, RoiRequest, RouteRequest};

pub const FETCH_ITEMS_FAILED_MESSAGE: &str = "Failed to fetch items.";
pub const FETCH_ROUTE_ITEMS_FAILED_MESSAGE: &str = "Failed to fetch items for routing.";
pub const SELECTION_TOO_SMALL_MESSAGE: &str =
    "Please select at least two locations to optimize a route.";
pub const ROUTE_FAILED_MESSAGE: &str = "Failed to optimize route.";
pub const NO_ROUTE_RETURNED_MESSAGE: &str = "No route returned by the backend.";
pub const EMPTY_URL_LIST_MESSAGE: &str = "Please enter at least one URL.";
pub const EMPTY_URL_MESSAGE: &str = "Please enter a listing URL.";
pub const DISCOVERY_FAILED_MESSAGE: &str =
    "Failed to discover URL. Please check the URL and API server, then try again.";
pub const BATCH_DISCOVERY_FAILED_MESSAGE: &str =
    "Failed to run multi-discovery. Please check the URLs and API server, then try again.";
pub const ROI_FAILED_MESSAGE: &str =
    "Failed to calculate ROI. Please check your inputs and the API server.";
pub const VERIFICATION_FAILED_MESSAGE: &str =
    "Failed to analyze image. Please check the file and the API server.";
pub const NO_IMAGE_SELECTED_MESSAGE: &str = "Please select an image file first.";

/// 最小選択数
pub const MIN_ROUTE_STOPS: usize = 2;

// ============================================
// 一覧（ダッシュボード）
// ============================================

/// スコア区分
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    High,
    Medium,
    Low,
    NoData,
}

impl ScoreTier {
    pub fn classify(score: Option<f64>) -> Self {
        match score {
            None => ScoreTier::NoData,
            Some(s) if s >= 8.0 => ScoreTier::High,
            Some(s) if s >= 5.0 => ScoreTier::Medium,
            Some(_) => ScoreTier::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreTier::High => "high",
            ScoreTier::Medium => "medium",
            ScoreTier::Low => "low",
            ScoreTier::NoData => "no data",
        }
    }

    /// バッジの配色クラス
    pub fn badge_class(&self) -> &'static str {
        match self {
            ScoreTier::High => "success",
            ScoreTier::Medium => "warning",
            ScoreTier::Low => "danger",
            ScoreTier::NoData => "secondary",
        }
    }
}

/// 画像URLリスト（JSON文字列）を読む。壊れていれば空。
pub fn parse_image_urls(image_urls: Option<&str>) -> Vec<String> {
    let Some(text) = image_urls else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<serde_json::Value>>(text) {
        Ok(values) => values
            .into_iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        Err(_) => Vec::new(),
    }
}

pub fn google_maps_link(lat: f64, lng: f64) -> String {
    format!("https://www.google.com/maps/search/?api=1&query={},{}", lat, lng)
}

/// ダッシュボードのカード1枚分
#[derive(Debug, Clone, PartialEq)]
pub struct ListEntry {
    pub id: i64,
    pub url: String,
    pub reasoning: String,
    pub status: String,
    pub score: Option<f64>,
    pub tier: ScoreTier,
    pub image: Option<String>,
    pub location: Option<(f64, f64)>,
}

impl ListEntry {
    pub fn from_item(item: &DiscoveredItem) -> Self {
        let reasoning = item
            .analysis
            .as_deref()
            .filter(|a| !a.is_empty())
            .unwrap_or("N/A")
            .to_string();

        Self {
            id: item.id,
            url: item.url.clone(),
            reasoning,
            status: item.status.clone(),
            score: item.score,
            tier: ScoreTier::classify(item.score),
            image: parse_image_urls(item.image_urls.as_deref()).into_iter().next(),
            location: item.location(),
        }
    }

    pub fn score_label(&self) -> String {
        match self.score {
            Some(score) => format!("{} / 10", score),
            None => "N/A".to_string(),
        }
    }

    pub fn location_label(&self) -> String {
        match self.location {
            Some((lat, lng)) => format!("{}, {}", lat, lng),
            None => "Not found".to_string(),
        }
    }

    pub fn maps_link(&self) -> Option<String> {
        self.location.map(|(lat, lng)| google_maps_link(lat, lng))
    }
}

/// 一覧射影: id降順（新しい順）
pub fn list_projection(items: &[DiscoveredItem]) -> Vec<ListEntry> {
    let mut entries: Vec<ListEntry> = items.iter().map(ListEntry::from_item).collect();
    entries.sort_by(|a, b| b.id.cmp(&a.id));
    entries
}

// ============================================
// ジオコード済み（ロジスティクス）
// ============================================

/// 住所付きアイテム
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedItem {
    pub id: i64,
    pub url: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
}

impl GeocodedItem {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            lat: self.lat,
            lng: self.lng,
        }
    }
}

/// 住所JSONを持つアイテムだけを残す。読めないものはエラーにせず捨てる。
pub fn geocoded_projection(items: &[DiscoveredItem]) -> Vec<GeocodedItem> {
    items
        .iter()
        .filter_map(|item| {
            let payload = parse_analysis(item.analysis.as_deref()?);
            match payload {
                AnalysisPayload::StructuredAddress(address) => Some(GeocodedItem {
                    id: item.id,
                    url: item.url.clone(),
                    address: address.label(),
                    lat: address.lat,
                    lng: address.lng,
                }),
                AnalysisPayload::OpaqueText(_) => None,
            }
        })
        .collect()
}

/// チェックされたidを選択順に保持する
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<i64>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// 未選択なら末尾に追加、選択済みなら外す
    pub fn toggle(&mut self, id: i64) {
        if let Some(pos) = self.ids.iter().position(|&selected| selected == id) {
            self.ids.remove(pos);
        } else {
            self.ids.push(id);
        }
    }

    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// 選択順の座標。再取得で消えたidは飛ばす。
    pub fn coordinates(&self, items: &[GeocodedItem]) -> Vec<Coordinate> {
        self.ids
            .iter()
            .filter_map(|id| items.iter().find(|item| item.id == *id))
            .map(GeocodedItem::coordinate)
            .collect()
    }

    pub fn can_submit(&self) -> bool {
        self.len() >= MIN_ROUTE_STOPS
    }
}

impl FromIterator<i64> for Selection {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        let mut selection = Selection::new();
        for id in iter {
            if !selection.contains(id) {
                selection.toggle(id);
            }
        }
        selection
    }
}

/// ルート最適化リクエストを組み立てる。2地点未満ならローカルエラー。
pub fn build_route_request(selection: &Selection, items: &[GeocodedItem]) -> Result<RouteRequest> {
    let coordinates = selection.coordinates(items);
    if coordinates.len() < MIN_ROUTE_STOPS {
        return Err(Error::Validation(SELECTION_TOO_SMALL_MESSAGE.to_string()));
    }
    Ok(RouteRequest { coordinates })
}

/// 最適化結果の表示行。空なら1行のお知らせにする。
pub fn stop_lines(stops: &[Coordinate]) -> Vec<String> {
    if stops.is_empty() {
        return vec![NO_ROUTE_RETURNED_MESSAGE.to_string()];
    }
    stops
        .iter()
        .enumerate()
        .map(|(i, stop)| format!("Stop {}: Lat: {:.4}, Lng: {:.4}", i + 1, stop.lat, stop.lng))
        .collect()
}

// ============================================
// 発見（単体・バッチ）
// ============================================

pub fn validate_listing_url(url: &str) -> Result<String> {
    let url = url.trim();
    if url.is_empty() {
        return Err(Error::Validation(EMPTY_URL_MESSAGE.to_string()));
    }
    Ok(url.to_string())
}

/// 改行区切りのURLリスト。空行は捨てる。
pub fn parse_url_list(text: &str) -> Result<Vec<String>> {
    let urls: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if urls.is_empty() {
        return Err(Error::Validation(EMPTY_URL_LIST_MESSAGE.to_string()));
    }
    Ok(urls)
}

// ============================================
// 査定（ROI）
// ============================================

pub const DEFAULT_PURITY: &str = "0.925";

/// ROIフォーム（入力欄は自由記述）
#[derive(Debug, Clone, PartialEq)]
pub struct RoiForm {
    pub weight_grams: String,
    pub purity: String,
    pub purchase_price: String,
}

impl Default for RoiForm {
    fn default() -> Self {
        Self {
            weight_grams: String::new(),
            purity: DEFAULT_PURITY.to_string(),
            purchase_price: String::new(),
        }
    }
}

impl RoiForm {
    /// 数値に変換してから送信する
    pub fn to_request(&self) -> Result<RoiRequest> {
        Ok(RoiRequest {
            weight_grams: parse_number("Weight", &self.weight_grams)?,
            purity: parse_number("Purity", &self.purity)?,
            purchase_price: parse_number("Purchase price", &self.purchase_price)?,
        })
    }
}

fn parse_number(field: &str, text: &str) -> Result<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| Error::Validation(format!("{} must be a number.", field)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, analysis: Option<&str>) -> DiscoveredItem {
        DiscoveredItem {
            id,
            url: format!("https://example.com/{}", id),
            analysis: analysis.map(str::to_string),
            status: "new".into(),
            ..Default::default()
        }
    }

    fn address_json(lat: f64, lng: f64) -> String {
        format!(r#"{{"address": {{"lat": {}, "lng": {}}}}}"#, lat, lng)
    }

    #[test]
    fn test_score_tier_boundaries() {
        assert_eq!(ScoreTier::classify(None), ScoreTier::NoData);
        assert_eq!(ScoreTier::classify(Some(10.0)), ScoreTier::High);
        assert_eq!(ScoreTier::classify(Some(8.0)), ScoreTier::High);
        assert_eq!(ScoreTier::classify(Some(7.99)), ScoreTier::Medium);
        assert_eq!(ScoreTier::classify(Some(5.0)), ScoreTier::Medium);
        assert_eq!(ScoreTier::classify(Some(4.99)), ScoreTier::Low);
        assert_eq!(ScoreTier::classify(Some(-3.0)), ScoreTier::Low);
        assert_eq!(ScoreTier::classify(Some(42.0)), ScoreTier::High);
        assert_eq!(ScoreTier::NoData.as_str(), "no data");
    }

    #[test]
    fn test_parse_image_urls() {
        assert_eq!(
            parse_image_urls(Some(r#"["https://img/a.jpg", 3, "https://img/b.jpg"]"#)),
            vec!["https://img/a.jpg".to_string(), "https://img/b.jpg".to_string()]
        );
        assert!(parse_image_urls(Some("not json")).is_empty());
        assert!(parse_image_urls(Some(r#"{"a": 1}"#)).is_empty());
        assert!(parse_image_urls(None).is_empty());
    }

    #[test]
    fn test_list_projection_sorted_newest_first() {
        let items = vec![item(2, None), item(9, None), item(5, None)];
        let ids: Vec<i64> = list_projection(&items).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![9, 5, 2]);
    }

    #[test]
    fn test_list_entry_fields() {
        let source = DiscoveredItem {
            score: Some(7.0),
            latitude: Some(40.7),
            longitude: Some(-74.0),
            image_urls: Some(r#"["https://img/first.jpg", "https://img/second.jpg"]"#.into()),
            ..item(1, Some("Sterling fork set"))
        };
        let entry = ListEntry::from_item(&source);

        assert_eq!(entry.reasoning, "Sterling fork set");
        assert_eq!(entry.tier, ScoreTier::Medium);
        assert_eq!(entry.score_label(), "7 / 10");
        assert_eq!(entry.image.as_deref(), Some("https://img/first.jpg"));
        assert_eq!(entry.location_label(), "40.7, -74");
        assert_eq!(
            entry.maps_link().as_deref(),
            Some("https://www.google.com/maps/search/?api=1&query=40.7,-74")
        );
    }

    #[test]
    fn test_list_entry_defaults() {
        let entry = ListEntry::from_item(&item(1, None));
        assert_eq!(entry.reasoning, "N/A");
        assert_eq!(entry.score_label(), "N/A");
        assert_eq!(entry.tier, ScoreTier::NoData);
        assert_eq!(entry.image, None);
        assert_eq!(entry.location_label(), "Not found");
        assert_eq!(entry.maps_link(), None);
    }

    #[test]
    fn test_geocoded_projection_filters_invalid() {
        let items = vec![
            item(1, Some(&address_json(40.0, -73.0))),
            item(2, Some("plain reasoning text")),
            item(3, None),
            item(4, Some(r#"{"address": {"lat": "40", "lng": "-73"}}"#)),
            item(
                5,
                Some(r#"{"address": {"lat": 51.5, "lng": -0.12, "formatted_address": "London"}}"#),
            ),
        ];

        let geocoded = geocoded_projection(&items);
        assert_eq!(geocoded.len(), 2);
        assert_eq!(geocoded[0].id, 1);
        assert_eq!(geocoded[0].address, "40, -73");
        assert_eq!((geocoded[0].lat, geocoded[0].lng), (40.0, -73.0));
        assert_eq!(geocoded[1].id, 5);
        assert_eq!(geocoded[1].address, "London");
    }

    #[test]
    fn test_selection_toggle_keeps_order() {
        let mut selection = Selection::new();
        selection.toggle(3);
        selection.toggle(1);
        selection.toggle(2);
        selection.toggle(1);
        assert_eq!(selection.ids(), &[3, 2]);
        selection.toggle(1);
        assert_eq!(selection.ids(), &[3, 2, 1]);
        assert!(selection.contains(2));
        assert!(selection.can_submit());
    }

    #[test]
    fn test_build_route_request_requires_two() {
        let items = geocoded_projection(&[
            item(1, Some(&address_json(1.0, 1.0))),
            item(2, Some(&address_json(2.0, 2.0))),
        ]);

        let empty = Selection::new();
        assert!(matches!(
            build_route_request(&empty, &items),
            Err(Error::Validation(ref m)) if m == SELECTION_TOO_SMALL_MESSAGE
        ));

        let single: Selection = [1].into_iter().collect();
        assert!(build_route_request(&single, &items).is_err());

        // 再取得で消えたidは数えない
        let stale: Selection = [1, 99].into_iter().collect();
        assert!(build_route_request(&stale, &items).is_err());
    }

    #[test]
    fn test_stop_lines() {
        let lines = stop_lines(&[
            Coordinate { lat: 35.681236, lng: 139.767125 },
            Coordinate { lat: 0.0, lng: -0.5 },
        ]);
        assert_eq!(
            lines,
            vec!["Stop 1: Lat: 35.6812, Lng: 139.7671", "Stop 2: Lat: 0.0000, Lng: -0.5000"]
        );

        // optimized_route が無い応答も黙って消さない
        assert_eq!(stop_lines(&[]), vec![NO_ROUTE_RETURNED_MESSAGE]);
    }

    #[test]
    fn test_build_route_request_uses_selection_order() {
        let items = geocoded_projection(&[
            item(1, Some(&address_json(1.0, 1.0))),
            item(2, Some(&address_json(2.0, 2.0))),
            item(3, Some(&address_json(3.0, 3.0))),
        ]);
        let selection: Selection = [3, 1].into_iter().collect();

        let request = build_route_request(&selection, &items).expect("リクエスト生成失敗");
        assert_eq!(
            request.coordinates,
            vec![Coordinate { lat: 3.0, lng: 3.0 }, Coordinate { lat: 1.0, lng: 1.0 }]
        );
    }

    #[test]
    fn test_parse_url_list() {
        let text = "  https://a.example/1 \n\n\thttps://b.example/2\n   \n";
        let urls = parse_url_list(text).expect("パース失敗");
        assert_eq!(urls, vec!["https://a.example/1", "https://b.example/2"]);

        assert!(matches!(
            parse_url_list(" \n \n"),
            Err(Error::Validation(ref m)) if m == EMPTY_URL_LIST_MESSAGE
        ));
    }

    #[test]
    fn test_validate_listing_url() {
        assert_eq!(validate_listing_url("  https://x/1 ").expect("検証失敗"), "https://x/1");
        assert!(validate_listing_url("   ").is_err());
    }

    #[test]
    fn test_roi_form_coercion() {
        let form = RoiForm {
            weight_grams: " 31.1 ".into(),
            purchase_price: "20".into(),
            ..Default::default()
        };
        let request = form.to_request().expect("変換失敗");
        assert_eq!(request.weight_grams, 31.1);
        assert_eq!(request.purity, 0.925);
        assert_eq!(request.purchase_price, 20.0);
    }

    #[test]
    fn test_roi_form_rejects_non_numeric() {
        let form = RoiForm {
            weight_grams: "heavy".into(),
            purchase_price: "20".into(),
            ..Default::default()
        };
        let error = form.to_request().unwrap_err();
        assert_eq!(error.user_message(ROI_FAILED_MESSAGE), "Weight must be a number.");

        let form = RoiForm {
            weight_grams: "1".into(),
            purchase_price: "NaN".into(),
            ..Default::default()
        };
        assert!(form.to_request().is_err());
    }
}
