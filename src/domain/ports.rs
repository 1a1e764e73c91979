use crate::domain::model::{
    ChartSettings, ChartSize, OutputFormat, Record, RecordSource, RenderResult,
};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 輸出檔案的寫入位置
pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn source(&self) -> Result<RecordSource>;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> Vec<OutputFormat>;
    fn chart_settings(&self) -> ChartSettings;
    fn chart_size(&self) -> ChartSize;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Record>>;
    async fn transform(&self, data: Vec<Record>) -> Result<RenderResult>;
    async fn load(&self, result: RenderResult) -> Result<String>;
}

/// 外部圖表資源：建立、更新、釋放
pub trait ChartBackend {
    type Handle;

    fn create(&mut self, size: ChartSize) -> Result<Self::Handle>;
    fn update(&mut self, handle: &mut Self::Handle, option: &serde_json::Value) -> Result<()>;
    fn destroy(&mut self, handle: Self::Handle);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TreemapEvent<'a> {
    Click { index: usize, raw: &'a Record },
}

pub trait EventSink: Send {
    fn emit(&mut self, event: TreemapEvent<'_>);
}

impl<F> EventSink for F
where
    F: FnMut(TreemapEvent<'_>) + Send,
{
    fn emit(&mut self, event: TreemapEvent<'_>) {
        self(event)
    }
}
