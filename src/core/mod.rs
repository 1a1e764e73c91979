pub mod alpha;
pub mod controller;
pub mod engine;
pub mod format;
pub mod option;
pub mod pipeline;

pub use crate::domain::model::{Record, RenderResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
