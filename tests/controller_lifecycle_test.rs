use fund_treemap::domain::ports::{ChartBackend, TreemapEvent};
use fund_treemap::{ChartSettings, ChartSize, HtmlBackend, Record, TreemapController, ValueFormat};
use serde_json::json;
use std::sync::{Arc, Mutex};

fn funds() -> Vec<Record> {
    serde_json::from_value(json!([
        {"name": "Growth", "scale": 1200.0, "url": "/funds/growth"},
        {"name": "Bond", "scale": 300.0, "url": "/funds/bond"}
    ]))
    .unwrap()
}

#[test]
fn test_html_controller_rerenders_on_changes() {
    let mut controller = TreemapController::new(HtmlBackend::default(), ChartSettings::default());
    controller.set_records(funds()).unwrap();
    controller.mount(ChartSize { width: 500, height: 400 }).unwrap();

    let first_id = controller.handle().unwrap().container_id.clone();
    assert!(controller.handle().unwrap().html.contains("Growth"));

    controller.set_format(ValueFormat::Currency).unwrap();
    let document = controller.handle().unwrap();
    assert_ne!(document.container_id, first_id);
    assert!(document.html.contains("$1,200.00"));
    assert_eq!(controller.backend().live_documents(), 1);

    controller.resize(ChartSize { width: 1024, height: 768 }).unwrap();
    assert!(controller.handle().unwrap().html.contains("width: 1024px; height: 768px;"));
    assert_eq!(controller.backend().live_documents(), 1);

    controller.unmount();
    assert!(!controller.is_mounted());
    assert_eq!(controller.backend().live_documents(), 0);
}

#[test]
fn test_click_forwards_raw_record_for_navigation() {
    let visited = Arc::new(Mutex::new(Vec::<String>::new()));
    let sink = visited.clone();

    let mut controller = TreemapController::new(HtmlBackend::default(), ChartSettings::default());
    controller.on_event(move |event: TreemapEvent<'_>| match event {
        TreemapEvent::Click { raw, .. } => {
            if let Some(url) = raw.get("url").and_then(|v| v.as_str()) {
                sink.lock().unwrap().push(url.to_string());
            }
        }
    });
    controller.set_records(funds()).unwrap();
    controller.mount(ChartSize::default()).unwrap();

    controller.click(1);
    controller.click(0);
    controller.click(9);

    assert_eq!(
        *visited.lock().unwrap(),
        vec!["/funds/bond".to_string(), "/funds/growth".to_string()]
    );
}

#[test]
fn test_backend_can_be_driven_directly() {
    let mut backend = HtmlBackend::new("Direct").with_script_src("echarts.js");
    let mut document = backend.create(ChartSize::default()).unwrap();
    backend.update(&mut document, &json!({"tooltip": {}, "series": []})).unwrap();

    assert!(document.html.contains(r#"<script src="echarts.js"></script>"#));
    backend.destroy(document);
    assert_eq!(backend.live_documents(), 0);
}
