//! 持有外部圖表資源，並與目前的記錄保持同步
//!
//! 記錄、顯示格式或容器尺寸一有變動，就釋放舊的資源並重新建立。
//! `unmount` 或 controller 被 drop 時釋放資源。

use crate::core::alpha::ScaleToAlphaMapper;
use crate::core::format::ValueFormatter;
use crate::core::option::{build_treemap_option, node_rows, total_scale};
use crate::domain::model::{ChartSettings, ChartSize, NodeRow, Record, TreemapNode, ValueFormat};
use crate::domain::ports::{ChartBackend, EventSink, TreemapEvent};
use crate::utils::error::Result;

pub struct TreemapController<B: ChartBackend> {
    backend: B,
    handle: Option<B::Handle>,
    records: Vec<Record>,
    settings: ChartSettings,
    size: ChartSize,
    sink: Option<Box<dyn EventSink>>,
}

impl<B: ChartBackend> TreemapController<B> {
    pub fn new(backend: B, settings: ChartSettings) -> Self {
        Self {
            backend,
            handle: None,
            records: Vec::new(),
            settings,
            size: ChartSize::default(),
            sink: None,
        }
    }

    pub fn on_event(&mut self, sink: impl EventSink + 'static) {
        self.sink = Some(Box::new(sink));
    }

    pub fn is_mounted(&self) -> bool {
        self.handle.is_some()
    }

    pub fn handle(&self) -> Option<&B::Handle> {
        self.handle.as_ref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn settings(&self) -> &ChartSettings {
        &self.settings
    }

    pub fn size(&self) -> ChartSize {
        self.size
    }

    pub fn mount(&mut self, size: ChartSize) -> Result<()> {
        self.size = size;
        self.refresh()
    }

    pub fn set_records(&mut self, records: Vec<Record>) -> Result<()> {
        self.records = records;
        self.refresh_if_mounted()
    }

    pub fn set_format(&mut self, format: ValueFormat) -> Result<()> {
        self.settings.format = format;
        self.refresh_if_mounted()
    }

    pub fn resize(&mut self, size: ChartSize) -> Result<()> {
        self.size = size;
        self.refresh_if_mounted()
    }

    pub fn unmount(&mut self) {
        if let Some(handle) = self.handle.take() {
            tracing::debug!("Releasing chart handle");
            self.backend.destroy(handle);
        }
    }

    pub fn nodes(&self) -> Vec<TreemapNode<'_>> {
        self.mapper().map(&self.records)
    }

    pub fn option(&self) -> serde_json::Value {
        let nodes = self.nodes();
        build_treemap_option(&nodes, &self.formatter_for(&nodes), &self.settings)
    }

    pub fn rows(&self) -> Vec<NodeRow> {
        let nodes = self.nodes();
        node_rows(&nodes, &self.formatter_for(&nodes))
    }

    /// 回傳被點擊區塊對應的原始記錄，並轉送給事件接收者
    pub fn click(&mut self, index: usize) -> Option<&Record> {
        let raw = self.records.get(index)?;
        if let Some(sink) = self.sink.as_mut() {
            sink.emit(TreemapEvent::Click { index, raw });
        }
        Some(raw)
    }

    fn formatter_for(&self, nodes: &[TreemapNode<'_>]) -> ValueFormatter {
        ValueFormatter::from_settings(&self.settings).with_total(total_scale(nodes))
    }

    fn mapper(&self) -> ScaleToAlphaMapper {
        ScaleToAlphaMapper::new(&self.settings.name_key, &self.settings.scale_key)
    }

    fn refresh_if_mounted(&mut self) -> Result<()> {
        if self.is_mounted() {
            self.refresh()
        } else {
            Ok(())
        }
    }

    fn refresh(&mut self) -> Result<()> {
        self.unmount();

        let option = self.option();
        let mut handle = self.backend.create(self.size)?;
        if let Err(e) = self.backend.update(&mut handle, &option) {
            self.backend.destroy(handle);
            return Err(e);
        }

        tracing::debug!(
            "Chart rendered with {} records at {}x{}",
            self.records.len(),
            self.size.width,
            self.size.height
        );
        self.handle = Some(handle);
        Ok(())
    }
}

impl<B: ChartBackend> Drop for TreemapController<B> {
    fn drop(&mut self) {
        self.unmount();
    }
}
