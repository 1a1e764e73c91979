use crate::core::ConfigProvider;
use crate::domain::model::{ChartSettings, ChartSize, OutputFormat, RecordSource, ValueFormat};
use crate::utils::error::{Result, TreemapError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub chart: Option<ChartConfig>,
    pub source: SourceConfig,
    pub mapping: Option<MappingConfig>,
    pub display: Option<DisplayConfig>,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    pub title: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub r#type: String,
    pub path: Option<String>,
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub headers: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingConfig {
    pub name_key: Option<String>,
    pub scale_key: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub format: Option<String>,
    pub currency_symbol: Option<String>,
    pub scale_label: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub verbose: Option<bool>,
    pub json_logs: Option<bool>,
}

const SOURCE_TYPES: [&str; 2] = ["file", "api"];
const OUTPUT_FORMATS: [&str; 3] = ["html", "json", "csv"];
const VALUE_FORMATS: [&str; 4] = ["plain", "large", "percent", "currency"];

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(TreemapError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| TreemapError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${FUND_API_TOKEN})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| TreemapError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_one_of("source.type", &self.source.r#type, &SOURCE_TYPES)?;
        match self.source.r#type.as_str() {
            "file" => {
                let path = validation::validate_required_field("source.path", &self.source.path)?;
                validation::validate_path("source.path", path)?;
                validation::validate_file_extension("source.path", path, &["json", "csv"])?;
            }
            _ => {
                let endpoint =
                    validation::validate_required_field("source.endpoint", &self.source.endpoint)?;
                validation::validate_url("source.endpoint", endpoint)?;
            }
        }

        validation::validate_path("load.output_path", &self.load.output_path)?;
        if let Some(formats) = &self.load.output_formats {
            for format in formats {
                validation::validate_one_of("load.output_formats", format, &OUTPUT_FORMATS)?;
            }
        }

        if let Some(mapping) = &self.mapping {
            if let Some(key) = &mapping.name_key {
                validation::validate_non_empty_string("mapping.name_key", key)?;
            }
            if let Some(key) = &mapping.scale_key {
                validation::validate_non_empty_string("mapping.scale_key", key)?;
            }
        }

        if let Some(format) = self.display.as_ref().and_then(|d| d.format.as_deref()) {
            validation::validate_one_of("display.format", format, &VALUE_FORMATS)?;
        }

        let size = self.chart_size();
        validation::validate_positive_number("chart.width", size.width, 1)?;
        validation::validate_positive_number("chart.height", size.height, 1)?;

        Ok(())
    }

    pub fn verbose(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.verbose)
            .unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn source(&self) -> Result<RecordSource> {
        match self.source.r#type.as_str() {
            "file" => {
                let path = validation::validate_required_field("source.path", &self.source.path)?;
                Ok(RecordSource::File { path: path.clone() })
            }
            "api" => {
                let endpoint =
                    validation::validate_required_field("source.endpoint", &self.source.endpoint)?;
                Ok(RecordSource::Api {
                    endpoint: endpoint.clone(),
                    headers: self.source.headers.clone().unwrap_or_default(),
                    timeout_seconds: self.source.timeout_seconds,
                })
            }
            other => Err(TreemapError::InvalidConfigValueError {
                field: "source.type".to_string(),
                value: other.to_string(),
                reason: format!("Valid types: {}", SOURCE_TYPES.join(", ")),
            }),
        }
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> Vec<OutputFormat> {
        match &self.load.output_formats {
            Some(formats) => formats
                .iter()
                .filter_map(|f| match f.as_str() {
                    "html" => Some(OutputFormat::Html),
                    "json" => Some(OutputFormat::Json),
                    "csv" => Some(OutputFormat::Csv),
                    _ => None,
                })
                .collect(),
            None => OutputFormat::ALL.to_vec(),
        }
    }

    fn chart_settings(&self) -> ChartSettings {
        let defaults = ChartSettings::default();
        let mapping = self.mapping.as_ref();
        let display = self.display.as_ref();

        ChartSettings {
            name_key: mapping
                .and_then(|m| m.name_key.clone())
                .unwrap_or(defaults.name_key),
            scale_key: mapping
                .and_then(|m| m.scale_key.clone())
                .unwrap_or(defaults.scale_key),
            format: display
                .and_then(|d| d.format.as_deref())
                .and_then(|f| f.parse::<ValueFormat>().ok())
                .unwrap_or(defaults.format),
            currency_symbol: display
                .and_then(|d| d.currency_symbol.clone())
                .unwrap_or(defaults.currency_symbol),
            scale_label: display
                .and_then(|d| d.scale_label.clone())
                .unwrap_or(defaults.scale_label),
            title: self.chart.as_ref().and_then(|c| c.title.clone()),
        }
    }

    fn chart_size(&self) -> ChartSize {
        let defaults = ChartSize::default();
        let chart = self.chart.as_ref();
        ChartSize {
            width: chart.and_then(|c| c.width).unwrap_or(defaults.width),
            height: chart.and_then(|c| c.height).unwrap_or(defaults.height),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
