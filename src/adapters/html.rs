use crate::domain::model::ChartSize;
use crate::domain::ports::ChartBackend;
use crate::utils::error::Result;

pub const DEFAULT_ECHARTS_SRC: &str =
    "https://cdn.jsdelivr.net/npm/echarts@5/dist/echarts.min.js";

/// 一份獨立的 HTML 頁面，內嵌圖表設定
#[derive(Debug, Clone, PartialEq)]
pub struct HtmlDocument {
    pub container_id: String,
    pub size: ChartSize,
    pub html: String,
}

#[derive(Debug, Clone)]
pub struct HtmlBackend {
    page_title: String,
    script_src: String,
    next_id: usize,
    live: usize,
}

impl HtmlBackend {
    pub fn new(page_title: impl Into<String>) -> Self {
        Self {
            page_title: page_title.into(),
            script_src: DEFAULT_ECHARTS_SRC.to_string(),
            next_id: 0,
            live: 0,
        }
    }

    pub fn with_script_src(mut self, src: impl Into<String>) -> Self {
        self.script_src = src.into();
        self
    }

    /// 已建立但尚未釋放的頁面數量
    pub fn live_documents(&self) -> usize {
        self.live
    }

    fn render(&self, document: &HtmlDocument, option: &serde_json::Value) -> Result<String> {
        // 字串值中的 "</script>" 會提早結束內嵌 script
        let option_json = serde_json::to_string(option)?.replace("</", "<\\/");

        Ok(format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{src}"></script>
</head>
<body>
<div id="{id}" style="width: {width}px; height: {height}px;"></div>
<script>
  var option = {option};
  option.tooltip.formatter = function (params) {{ return params.data.summary; }};
  var chart = echarts.init(document.getElementById("{id}"));
  chart.setOption(option);
  window.addEventListener("resize", function () {{ chart.resize(); }});
</script>
</body>
</html>
"#,
            title = escape_html(&self.page_title),
            src = self.script_src,
            id = document.container_id,
            width = document.size.width,
            height = document.size.height,
            option = option_json,
        ))
    }
}

impl Default for HtmlBackend {
    fn default() -> Self {
        Self::new("Fund Treemap")
    }
}

impl ChartBackend for HtmlBackend {
    type Handle = HtmlDocument;

    fn create(&mut self, size: ChartSize) -> Result<HtmlDocument> {
        self.next_id += 1;
        self.live += 1;
        let container_id = format!("treemap-{}", self.next_id);
        tracing::debug!("Creating chart container {}", container_id);
        Ok(HtmlDocument {
            container_id,
            size,
            html: String::new(),
        })
    }

    fn update(&mut self, handle: &mut HtmlDocument, option: &serde_json::Value) -> Result<()> {
        handle.html = self.render(handle, option)?;
        Ok(())
    }

    fn destroy(&mut self, handle: HtmlDocument) {
        self.live = self.live.saturating_sub(1);
        tracing::debug!("Disposed chart container {}", handle.container_id);
    }
}

/// 跳脫 HTML 特殊字元，用於頁面標題與 tooltip 文字
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
