pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, LocalStorage};

pub use adapters::html::{HtmlBackend, HtmlDocument};
pub use crate::core::{
    alpha::ScaleToAlphaMapper, controller::TreemapController, engine::TreemapEngine,
    format::ValueFormatter, pipeline::TreemapPipeline,
};
pub use domain::model::{ChartSettings, ChartSize, Record, Rgba, TreemapNode, ValueFormat};
pub use utils::error::{Result, TreemapError};
