use crate::adapters::html::HtmlBackend;
use crate::adapters::source::RecordLoader;
use crate::core::controller::TreemapController;
use crate::core::{ConfigProvider, Pipeline, Record, RenderResult, Storage};
use crate::domain::model::{NodeRow, OutputFormat};
use crate::utils::error::{Result, TreemapError};

pub struct TreemapPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    loader: RecordLoader,
}

impl<S: Storage, C: ConfigProvider> TreemapPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            loader: RecordLoader::new(),
        }
    }

    pub fn config(&self) -> &C {
        &self.config
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for TreemapPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Record>> {
        let source = self.config.source()?;
        tracing::info!("Loading records from {}", source);
        self.loader.load(&source).await
    }

    async fn transform(&self, data: Vec<Record>) -> Result<RenderResult> {
        let settings = self.config.chart_settings();
        let page_title = settings
            .title
            .clone()
            .unwrap_or_else(|| "Fund Treemap".to_string());

        let mut controller = TreemapController::new(HtmlBackend::new(page_title), settings);
        controller.set_records(data)?;
        controller.mount(self.config.chart_size())?;

        let html = controller
            .handle()
            .map(|document| document.html.clone())
            .ok_or_else(|| TreemapError::RenderError {
                message: "chart was not mounted".to_string(),
            })?;
        let option = controller.option();
        let rows = controller.rows();
        let csv_output = rows_to_csv(&rows)?;

        Ok(RenderResult {
            rows,
            option,
            html,
            csv_output,
        })
    }

    async fn load(&self, result: RenderResult) -> Result<String> {
        let formats = self.config.output_formats();
        if formats.is_empty() {
            return Err(TreemapError::ConfigError {
                message: "no output format selected".to_string(),
            });
        }

        for format in formats {
            let data = match format {
                OutputFormat::Html => result.html.clone().into_bytes(),
                OutputFormat::Json => serde_json::to_vec_pretty(&result.option)?,
                OutputFormat::Csv => result.csv_output.clone().into_bytes(),
            };
            tracing::debug!("Writing {} ({} bytes)", format.file_name(), data.len());
            self.storage.write_file(format.file_name(), &data).await?;
        }

        Ok(self.config.output_path().to_string())
    }
}

pub fn rows_to_csv(rows: &[NodeRow]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    if rows.is_empty() {
        writer.write_record(["name", "scale", "alpha", "color", "label"])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| TreemapError::ProcessingError {
            message: format!("failed to flush CSV: {}", e),
        })?;
    String::from_utf8(bytes).map_err(|e| TreemapError::ProcessingError {
        message: format!("CSV output is not UTF-8: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ChartSettings, ChartSize, RecordSource};
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        source: RecordSource,
        formats: Vec<OutputFormat>,
        settings: ChartSettings,
    }

    impl MockConfig {
        fn new(formats: Vec<OutputFormat>) -> Self {
            Self {
                source: RecordSource::File {
                    path: "unused.json".to_string(),
                },
                formats,
                settings: ChartSettings::default(),
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn source(&self) -> Result<RecordSource> {
            Ok(self.source.clone())
        }

        fn output_path(&self) -> &str {
            "test_output"
        }

        fn output_formats(&self) -> Vec<OutputFormat> {
            self.formats.clone()
        }

        fn chart_settings(&self) -> ChartSettings {
            self.settings.clone()
        }

        fn chart_size(&self) -> ChartSize {
            ChartSize {
                width: 320,
                height: 200,
            }
        }
    }

    fn funds() -> Vec<Record> {
        serde_json::from_value(json!([
            {"name": "A", "scale": 200},
            {"name": "B", "scale": 150},
            {"name": "C", "scale": 100},
            {"name": "D", "scale": 50}
        ]))
        .unwrap()
    }

    #[tokio::test]
    async fn test_transform_builds_all_outputs() {
        let pipeline = TreemapPipeline::new(MockStorage::new(), MockConfig::new(vec![]));

        let result = pipeline.transform(funds()).await.unwrap();

        let alphas: Vec<f64> = result.rows.iter().map(|r| r.alpha).collect();
        assert_eq!(alphas, vec![0.9, 0.8, 0.6, 0.5]);
        assert!(result.html.contains("width: 320px; height: 200px;"));
        assert_eq!(result.option["series"][0]["data"][2]["name"], "C");
        assert!(result
            .csv_output
            .starts_with("name,scale,alpha,color,label\n"));
        let first_row = result.csv_output.lines().nth(1).unwrap();
        assert!(first_row.starts_with("A,"));
        assert!(first_row.contains("\"rgba(87, 129, 253, 0.9)\""));
    }

    #[tokio::test]
    async fn test_transform_empty_input() {
        let pipeline = TreemapPipeline::new(MockStorage::new(), MockConfig::new(vec![]));

        let result = pipeline.transform(Vec::new()).await.unwrap();

        assert!(result.rows.is_empty());
        assert_eq!(result.option["series"][0]["data"], json!([]));
        assert_eq!(result.csv_output, "name,scale,alpha,color,label\n");
    }

    #[tokio::test]
    async fn test_load_writes_selected_formats() {
        let storage = MockStorage::new();
        let pipeline = TreemapPipeline::new(
            storage.clone(),
            MockConfig::new(vec![OutputFormat::Json, OutputFormat::Csv]),
        );

        let result = pipeline.transform(funds()).await.unwrap();
        let output_path = pipeline.load(result).await.unwrap();

        assert_eq!(output_path, "test_output");
        assert!(storage.get_file("treemap.html").await.is_none());
        let json_bytes = storage.get_file("treemap.json").await.unwrap();
        let option: serde_json::Value = serde_json::from_slice(&json_bytes).unwrap();
        assert_eq!(option["series"][0]["type"], "treemap");
        assert!(storage.get_file("treemap.csv").await.is_some());
    }

    #[tokio::test]
    async fn test_load_without_formats_fails() {
        let pipeline = TreemapPipeline::new(MockStorage::new(), MockConfig::new(vec![]));
        let result = pipeline.transform(funds()).await.unwrap();

        let err = pipeline.load(result).await.unwrap_err();
        assert!(matches!(err, TreemapError::ConfigError { .. }));
    }
}
