use crate::core::{ConfigProvider, Storage};
use crate::domain::model::{
    ChartSettings, ChartSize, OutputFormat, RecordSource, ValueFormat,
};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "fund-treemap")]
#[command(about = "Render fund sizes as a single-level treemap")]
pub struct CliConfig {
    /// Local .json/.csv file or http(s) endpoint returning a JSON array
    #[arg(short, long)]
    pub input: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, default_value = "name")]
    pub name_key: String,

    #[arg(long, default_value = "scale")]
    pub scale_key: String,

    #[arg(long, value_enum, default_value = "plain")]
    pub format: ValueFormat,

    #[arg(long, default_value = "$")]
    pub currency_symbol: String,

    #[arg(long, default_value = "Scale")]
    pub scale_label: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long, default_value = "960")]
    pub width: u32,

    #[arg(long, default_value = "540")]
    pub height: u32,

    #[arg(long, value_enum, value_delimiter = ',', default_values = ["html", "json", "csv"])]
    pub output_formats: Vec<OutputFormat>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

impl ConfigProvider for CliConfig {
    fn source(&self) -> Result<RecordSource> {
        Ok(RecordSource::from_location(&self.input))
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> Vec<OutputFormat> {
        self.output_formats.clone()
    }

    fn chart_settings(&self) -> ChartSettings {
        ChartSettings {
            name_key: self.name_key.clone(),
            scale_key: self.scale_key.clone(),
            format: self.format,
            currency_symbol: self.currency_symbol.clone(),
            scale_label: self.scale_label.clone(),
            title: self.title.clone(),
        }
    }

    fn chart_size(&self) -> ChartSize {
        ChartSize {
            width: self.width,
            height: self.height,
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        match self.source()? {
            RecordSource::File { path } => {
                validation::validate_path("input", &path)?;
                validation::validate_file_extension("input", &path, &["json", "csv"])?;
            }
            RecordSource::Api { endpoint, .. } => validation::validate_url("input", &endpoint)?,
        }
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_non_empty_string("name_key", &self.name_key)?;
        validation::validate_non_empty_string("scale_key", &self.scale_key)?;
        validation::validate_positive_number("width", self.width, 1)?;
        validation::validate_positive_number("height", self.height, 1)?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let config = CliConfig::parse_from(["fund-treemap", "--input", "funds.json"]);

        assert_eq!(config.name_key, "name");
        assert_eq!(config.scale_key, "scale");
        assert_eq!(config.format, ValueFormat::Plain);
        assert_eq!(config.output_formats, OutputFormat::ALL.to_vec());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_overrides() {
        let config = CliConfig::parse_from([
            "fund-treemap",
            "--input",
            "https://example.com/funds",
            "--format",
            "currency",
            "--currency-symbol",
            "¥",
            "--output-formats",
            "json,csv",
            "--title",
            "Top funds",
        ]);

        assert!(matches!(config.source().unwrap(), RecordSource::Api { .. }));
        assert_eq!(config.chart_settings().format, ValueFormat::Currency);
        assert_eq!(config.chart_settings().title.as_deref(), Some("Top funds"));
        assert_eq!(config.output_formats(), vec![OutputFormat::Json, OutputFormat::Csv]);
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        let config = CliConfig::parse_from(["fund-treemap", "--input", "funds.xlsx"]);
        assert!(config.validate().is_err());

        let config =
            CliConfig::parse_from(["fund-treemap", "--input", "funds.csv", "--width", "0"]);
        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn test_local_storage_creates_nested_dirs() {
        let dir = tempfile::TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path().to_str().unwrap().to_string());

        storage.write_file("nested/treemap.json", b"{}").await.unwrap();
        let data = std::fs::read(dir.path().join("nested/treemap.json")).unwrap();
        assert_eq!(data, b"{}");
    }
}
