use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

pub struct TreemapEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> TreemapEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("🚀 Starting treemap build");

        // Extract
        let records = self.pipeline.extract().await?;
        tracing::info!("📥 Extracted {} records", records.len());
        if records.is_empty() {
            tracing::warn!("No records found, the treemap will be empty");
        }

        // Transform
        let result = self.pipeline.transform(records).await?;
        tracing::info!("🎨 Mapped {} treemap nodes", result.rows.len());

        // Load
        let output_path = self.pipeline.load(result).await?;
        tracing::info!(
            "📁 Output saved to: {} (took {:?})",
            output_path,
            started.elapsed()
        );

        Ok(output_path)
    }
}
