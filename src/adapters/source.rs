use crate::domain::model::{Record, RecordSource};
use crate::utils::error::{Result, TreemapError};
use reqwest::Client;
use std::path::Path;
use std::time::Duration;

/// 從本地檔案或 HTTP API 讀取基金記錄
#[derive(Debug, Clone, Default)]
pub struct RecordLoader {
    client: Client,
}

impl RecordLoader {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub async fn load(&self, source: &RecordSource) -> Result<Vec<Record>> {
        match source {
            RecordSource::File { path } => self.load_file(path).await,
            RecordSource::Api {
                endpoint,
                headers,
                timeout_seconds,
            } => {
                let mut request = self.client.get(endpoint);

                // 添加自定義標頭
                for (key, value) in headers {
                    request = request.header(key, value);
                }

                if let Some(timeout) = timeout_seconds {
                    request = request.timeout(Duration::from_secs(*timeout));
                }

                tracing::debug!("Making API request to: {}", endpoint);
                let response = request.send().await?;
                tracing::debug!("API response status: {}", response.status());

                if !response.status().is_success() {
                    return Err(TreemapError::SourceError {
                        message: format!("{} returned status {}", endpoint, response.status()),
                    });
                }

                let json_data: serde_json::Value = response.json().await?;
                parse_json_records(json_data)
            }
        }
    }

    async fn load_file(&self, path: &str) -> Result<Vec<Record>> {
        let extension = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        tracing::debug!("Reading records from {}", path);
        let bytes = tokio::fs::read(path).await?;

        match extension.as_deref() {
            Some("json") => parse_json_records(serde_json::from_slice(&bytes)?),
            Some("csv") => parse_csv_records(&bytes),
            _ => Err(TreemapError::SourceError {
                message: format!("{} is neither a .json nor a .csv file", path),
            }),
        }
    }
}

/// 接受物件陣列，或以 `data` 包住陣列的物件；其他物件視為單筆記錄
pub fn parse_json_records(json_data: serde_json::Value) -> Result<Vec<Record>> {
    let items = match json_data {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut obj) => match obj.remove("data") {
            Some(serde_json::Value::Array(items)) => items,
            Some(other) => {
                obj.insert("data".to_string(), other);
                vec![serde_json::Value::Object(obj)]
            }
            None => vec![serde_json::Value::Object(obj)],
        },
        other => {
            return Err(TreemapError::SourceError {
                message: format!("expected a JSON array of records, got {}", json_type(&other)),
            })
        }
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match item {
            serde_json::Value::Object(obj) => records.push(Record::new(obj)),
            other => {
                tracing::warn!("Skipping item {}: not an object ({})", index, json_type(&other));
            }
        }
    }

    tracing::debug!("Parsed {} records from JSON", records.len());
    Ok(records)
}

/// 標題列提供欄位名稱，每個儲存格都保留為字串
pub fn parse_csv_records(bytes: &[u8]) -> Result<Vec<Record>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes);
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let data = headers
            .iter()
            .zip(row.iter())
            .map(|(key, value)| {
                (
                    key.to_string(),
                    serde_json::Value::String(value.to_string()),
                )
            })
            .collect();
        records.push(Record::new(data));
    }

    tracing::debug!("Parsed {} records from CSV", records.len());
    Ok(records)
}

fn json_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
