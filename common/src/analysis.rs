//! `analysis` フィールドの二重エンコーディング
//!
//! 同じフィールドがダッシュボードでは自由記述テキスト、ロジスティクスでは
//! 住所JSONとして扱われる。ここで「パースを試み、だめならテキスト」として
//! 和型に落とし、呼び出し側はパターンマッチで分岐する。

use serde_json::Value;

/// 住所付き解析結果
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredAddress {
    pub lat: f64,
    pub lng: f64,
    pub formatted_address: Option<String>,
}

impl StructuredAddress {
    /// 表示用ラベル（整形済み住所がなければ "lat, lng"）
    pub fn label(&self) -> String {
        match self.formatted_address.as_deref().map(str::trim) {
            Some(address) if !address.is_empty() => address.to_string(),
            _ => format!("{}, {}", self.lat, self.lng),
        }
    }
}

/// `analysis` の解釈結果
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisPayload {
    StructuredAddress(StructuredAddress),
    OpaqueText(String),
}

impl AnalysisPayload {
    pub fn address(&self) -> Option<&StructuredAddress> {
        match self {
            AnalysisPayload::StructuredAddress(address) => Some(address),
            AnalysisPayload::OpaqueText(_) => None,
        }
    }
}

/// `analysis` を解釈する。失敗しない。
///
/// JSONオブジェクトで、`address` がオブジェクトかつ `lat`/`lng` が有限の数値の
/// 場合のみ `StructuredAddress`。それ以外はすべて元の文字列のまま `OpaqueText`。
pub fn parse_analysis(text: &str) -> AnalysisPayload {
    match structured_address(text) {
        Some(address) => AnalysisPayload::StructuredAddress(address),
        None => AnalysisPayload::OpaqueText(text.to_string()),
    }
}

fn structured_address(text: &str) -> Option<StructuredAddress> {
    let value: Value = serde_json::from_str(text).ok()?;
    let address = value.get("address")?.as_object()?;

    let lat = address.get("lat")?.as_f64()?;
    let lng = address.get("lng")?.as_f64()?;
    if !lat.is_finite() || !lng.is_finite() {
        return None;
    }

    let formatted_address = address
        .get("formatted_address")
        .and_then(Value::as_str)
        .map(str::to_string);

    Some(StructuredAddress {
        lat,
        lng,
        formatted_address,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_opaque() {
        let text = "Heavy sterling piece, seller seems unaware of value";
        assert_eq!(parse_analysis(text), AnalysisPayload::OpaqueText(text.to_string()));
    }

    #[test]
    fn test_structured_address() {
        let text = r#"{"reasoning": "ok", "address": {"lat": 40.71, "lng": -74.0, "formatted_address": "New York, NY"}}"#;
        let payload = parse_analysis(text);
        let address = payload.address().expect("住所が取れない");
        assert_eq!(address.lat, 40.71);
        assert_eq!(address.lng, -74.0);
        assert_eq!(address.label(), "New York, NY");
    }

    #[test]
    fn test_structured_address_without_formatted() {
        let payload = parse_analysis(r#"{"address": {"lat": 1.5, "lng": 2}}"#);
        assert_eq!(payload.address().map(StructuredAddress::label).as_deref(), Some("1.5, 2"));
    }

    #[test]
    fn test_zero_coordinates_are_numeric() {
        let payload = parse_analysis(r#"{"address": {"lat": 0, "lng": 0}}"#);
        assert!(payload.address().is_some());
    }

    #[test]
    fn test_non_numeric_coordinates_are_opaque() {
        for text in [
            r#"{"address": {"lat": "40.7", "lng": "-74.0"}}"#,
            r#"{"address": {"lat": 40.7}}"#,
            r#"{"address": {"lat": null, "lng": 1}}"#,
            r#"{"address": "221B Baker Street"}"#,
            r#"{"reasoning": "no address"}"#,
            r#"[1, 2, 3]"#,
            r#""just a json string""#,
            "{broken json",
            "",
        ] {
            assert!(
                matches!(parse_analysis(text), AnalysisPayload::OpaqueText(ref t) if t == text),
                "構造化されてはいけない: {}",
                text
            );
        }
    }
}
