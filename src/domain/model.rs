use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// 一筆輸入記錄：任意欄位的 JSON 物件，名稱與規模欄位由設定決定
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl Record {
    pub fn new(data: serde_json::Map<String, serde_json::Value>) -> Self {
        Self { data }
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Record {
    fn from(data: serde_json::Map<String, serde_json::Value>) -> Self {
        Self { data }
    }
}

/// 固定色相、透明度可變的 RGBA 顏色
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f64,
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.alpha)
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// 映射後的 treemap 節點，`raw` 指回原始輸入記錄
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreemapNode<'a> {
    pub name: String,
    pub value: f64,
    pub scale: f64,
    pub raw: &'a Record,
    pub color: Rgba,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSize {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartSize {
    fn default() -> Self {
        Self {
            width: 960,
            height: 540,
        }
    }
}

/// 標籤與 tooltip 中規模文字的顯示格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ValueFormat {
    #[default]
    Plain,
    Large,
    Percent,
    Currency,
}

impl ValueFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueFormat::Plain => "plain",
            ValueFormat::Large => "large",
            ValueFormat::Percent => "percent",
            ValueFormat::Currency => "currency",
        }
    }
}

impl FromStr for ValueFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" => Ok(ValueFormat::Plain),
            "large" => Ok(ValueFormat::Large),
            "percent" => Ok(ValueFormat::Percent),
            "currency" => Ok(ValueFormat::Currency),
            other => Err(format!("unknown value format: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Html,
    Json,
    Csv,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Html, OutputFormat::Json, OutputFormat::Csv];

    pub fn file_name(&self) -> &'static str {
        match self {
            OutputFormat::Html => "treemap.html",
            OutputFormat::Json => "treemap.json",
            OutputFormat::Csv => "treemap.csv",
        }
    }
}

/// 繪圖相關設定：欄位鍵、顯示格式、標題
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSettings {
    pub name_key: String,
    pub scale_key: String,
    pub format: ValueFormat,
    pub currency_symbol: String,
    pub scale_label: String,
    pub title: Option<String>,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            name_key: "name".to_string(),
            scale_key: "scale".to_string(),
            format: ValueFormat::Plain,
            currency_symbol: "$".to_string(),
            scale_label: "Scale".to_string(),
            title: None,
        }
    }
}

/// 基金記錄的來源
#[derive(Debug, Clone, PartialEq)]
pub enum RecordSource {
    File {
        path: String,
    },
    Api {
        endpoint: String,
        headers: HashMap<String, String>,
        timeout_seconds: Option<u64>,
    },
}

impl RecordSource {
    /// `http://` / `https://` 開頭視為 API，其餘視為本地檔案
    pub fn from_location(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            RecordSource::Api {
                endpoint: location.to_string(),
                headers: HashMap::new(),
                timeout_seconds: None,
            }
        } else {
            RecordSource::File {
                path: location.to_string(),
            }
        }
    }
}

impl fmt::Display for RecordSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordSource::File { path } => write!(f, "file {}", path),
            RecordSource::Api { endpoint, .. } => write!(f, "api {}", endpoint),
        }
    }
}

/// CSV 摘要的一列
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeRow {
    pub name: String,
    pub scale: f64,
    pub alpha: f64,
    pub color: String,
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct RenderResult {
    pub rows: Vec<NodeRow>,
    pub option: serde_json::Value,
    pub html: String,
    pub csv_output: String,
}
