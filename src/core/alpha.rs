//! 規模到透明度的映射
//!
//! 所有記錄使用同一個基底色，透明度表示該筆規模在最小與最大值之間的位置。
//! 位置先經過餘弦緩動，兩端被壓縮、中段被拉開。

use crate::domain::model::{Record, Rgba, TreemapNode};
use std::f64::consts::PI;

pub const MIN_ALPHA: f64 = 0.5;
pub const MAX_ALPHA: f64 = 0.9;
pub const BASE_COLOR: (u8, u8, u8) = (87, 129, 253);

/// 讀取規模數值，非有限數字一律視為 `0`
pub fn coerce_scale(value: Option<&serde_json::Value>) -> f64 {
    let number = match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        _ => None,
    };

    match number {
        Some(n) if n.is_finite() => n,
        _ => 0.0,
    }
}

/// 顯示名稱：字串直接使用，其他 JSON 值用其文字表示，缺值為空字串
pub fn display_name(value: Option<&serde_json::Value>) -> String {
    match value {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// `0.5 - 0.5 * cos(π * lin)`，在 `[0, 1]` 上單調遞增
pub fn ease_in_out(lin: f64) -> f64 {
    0.5 - 0.5 * (PI * lin).cos()
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// `scale` 在 `[min, max]` 區間內對應的透明度；區間寬度為零時回傳 `MAX_ALPHA`
pub fn alpha_for(scale: f64, min: f64, max: f64) -> f64 {
    // 先各自減半再相減，極端的 min/max 也不會溢位成 inf
    let range = max / 2.0 - min / 2.0;
    if range <= 0.0 {
        return MAX_ALPHA;
    }

    let lin = ((scale / 2.0 - min / 2.0) / range).clamp(0.0, 1.0);
    let t = ease_in_out(lin);
    let alpha = (MIN_ALPHA + t * (MAX_ALPHA - MIN_ALPHA)).clamp(MIN_ALPHA, MAX_ALPHA);
    round3(alpha)
}

pub fn color_for(alpha: f64) -> Rgba {
    let (r, g, b) = BASE_COLOR;
    Rgba { r, g, b, alpha }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaleToAlphaMapper {
    name_key: String,
    scale_key: String,
}

impl Default for ScaleToAlphaMapper {
    fn default() -> Self {
        Self::new("name", "scale")
    }
}

impl ScaleToAlphaMapper {
    pub fn new(name_key: impl Into<String>, scale_key: impl Into<String>) -> Self {
        Self {
            name_key: name_key.into(),
            scale_key: scale_key.into(),
        }
    }

    pub fn name_key(&self) -> &str {
        &self.name_key
    }

    pub fn scale_key(&self) -> &str {
        &self.scale_key
    }

    /// 每筆記錄對應一個節點，輸出的長度與順序與 `records` 相同
    pub fn map<'a>(&self, records: &'a [Record]) -> Vec<TreemapNode<'a>> {
        if records.is_empty() {
            return Vec::new();
        }

        let scales: Vec<f64> = records
            .iter()
            .map(|record| coerce_scale(record.get(&self.scale_key)))
            .collect();

        let (min, max) = scales
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &s| {
                (lo.min(s), hi.max(s))
            });

        records
            .iter()
            .zip(scales)
            .map(|(record, scale)| TreemapNode {
                name: display_name(record.get(&self.name_key)),
                value: scale,
                scale,
                raw: record,
                color: color_for(alpha_for(scale, min, max)),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(values: serde_json::Value) -> Vec<Record> {
        serde_json::from_value(values).unwrap()
    }

    fn alphas(nodes: &[TreemapNode<'_>]) -> Vec<f64> {
        nodes.iter().map(|n| n.color.alpha).collect()
    }

    #[test]
    fn test_four_funds_spread_over_band() {
        let input = records(json!([
            {"name": "A", "scale": 200},
            {"name": "B", "scale": 150},
            {"name": "C", "scale": 100},
            {"name": "D", "scale": 50}
        ]));
        let nodes = ScaleToAlphaMapper::default().map(&input);

        assert_eq!(alphas(&nodes), vec![0.9, 0.8, 0.6, 0.5]);
        assert_eq!(nodes[0].color.to_string(), "rgba(87, 129, 253, 0.9)");
        assert_eq!(nodes[3].color.to_string(), "rgba(87, 129, 253, 0.5)");
        let names: Vec<&str> = nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_equal_scales_get_max_alpha() {
        let input = records(json!([
            {"name": "X", "scale": 10},
            {"name": "Y", "scale": 10}
        ]));
        let nodes = ScaleToAlphaMapper::default().map(&input);
        assert_eq!(alphas(&nodes), vec![MAX_ALPHA, MAX_ALPHA]);
    }

    #[test]
    fn test_missing_scale_is_zero() {
        let input = records(json!([{"name": "Z"}]));
        let nodes = ScaleToAlphaMapper::default().map(&input);

        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].value, 0.0);
        assert_eq!(nodes[0].scale, 0.0);
        assert_eq!(nodes[0].color.alpha, MAX_ALPHA);
    }

    #[test]
    fn test_empty_input() {
        assert!(ScaleToAlphaMapper::default().map(&[]).is_empty());
    }

    #[test]
    fn test_coerce_scale() {
        assert_eq!(coerce_scale(Some(&json!(12.5))), 12.5);
        assert_eq!(coerce_scale(Some(&json!(" 42 "))), 42.0);
        assert_eq!(coerce_scale(Some(&json!(""))), 0.0);
        assert_eq!(coerce_scale(Some(&json!("n/a"))), 0.0);
        assert_eq!(coerce_scale(Some(&json!(null))), 0.0);
        assert_eq!(coerce_scale(Some(&json!(true))), 0.0);
        assert_eq!(coerce_scale(Some(&json!([1, 2]))), 0.0);
        assert_eq!(coerce_scale(Some(&json!("inf"))), 0.0);
        assert_eq!(coerce_scale(None), 0.0);
    }

    #[test]
    fn test_custom_keys_and_passthrough() {
        let input = records(json!([
            {"fundName": "Alpha", "size": "300", "code": "000001"},
            {"fundName": "Beta", "size": 100, "code": "000002"}
        ]));
        let nodes = ScaleToAlphaMapper::new("fundName", "size").map(&input);

        assert_eq!(nodes[0].name, "Alpha");
        assert_eq!(nodes[0].value, 300.0);
        assert_eq!(nodes[1].raw.get("code"), Some(&json!("000002")));
        assert!(std::ptr::eq(nodes[1].raw, &input[1]));
    }

    #[test]
    fn test_ease_curve_endpoints() {
        assert_eq!(ease_in_out(0.0), 0.0);
        assert!((ease_in_out(0.5) - 0.5).abs() < 1e-12);
        assert!((ease_in_out(1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_alpha_for_extreme_range() {
        assert_eq!(alpha_for(f64::MAX, -f64::MAX, f64::MAX), MAX_ALPHA);
        assert_eq!(alpha_for(-f64::MAX, -f64::MAX, f64::MAX), MIN_ALPHA);
        assert_eq!(alpha_for(0.0, -f64::MAX, f64::MAX), 0.7);
    }

    #[test]
    fn test_non_string_name() {
        assert_eq!(display_name(Some(&json!(7))), "7");
        assert_eq!(display_name(None), "");
    }
}
