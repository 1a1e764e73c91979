use crate::core::format::ValueFormatter;
use crate::domain::model::{ChartSettings, NodeRow, TreemapNode};
use serde_json::{json, Value};

/// 將節點組裝成 treemap 圖表設定（ECharts option 格式）
pub fn build_treemap_option(
    nodes: &[TreemapNode<'_>],
    formatter: &ValueFormatter,
    settings: &ChartSettings,
) -> Value {
    let data: Vec<Value> = nodes
        .iter()
        .map(|node| {
            json!({
                "name": node.name,
                "value": node.value,
                "scale": node.scale,
                "label": formatter.format(node.scale),
                "summary": formatter.summary(&node.name, node.scale),
                "itemStyle": { "color": node.color },
                "raw": node.raw,
            })
        })
        .collect();

    let mut option = json!({
        "tooltip": { "show": true, "trigger": "item" },
        "series": [{
            "type": "treemap",
            "name": settings.title.clone().unwrap_or_default(),
            "leafDepth": 1,
            "roam": false,
            "nodeClick": false,
            "breadcrumb": { "show": false },
            "label": { "show": true, "formatter": "{b}" },
            "itemStyle": { "borderColor": "#fff", "borderWidth": 1, "gapWidth": 1 },
            "data": data,
        }],
    });

    if let Some(title) = &settings.title {
        option["title"] = json!({ "text": title, "left": "center" });
    }

    option
}

/// 所有規模的總和，作為百分比的分母
pub fn total_scale(nodes: &[TreemapNode<'_>]) -> f64 {
    nodes.iter().map(|n| n.scale).sum()
}

pub fn node_rows(nodes: &[TreemapNode<'_>], formatter: &ValueFormatter) -> Vec<NodeRow> {
    nodes
        .iter()
        .map(|node| NodeRow {
            name: node.name.clone(),
            scale: node.scale,
            alpha: node.color.alpha,
            color: node.color.to_string(),
            label: formatter.format(node.scale),
        })
        .collect()
}
