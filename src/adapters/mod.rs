// Adapters layer: concrete implementations for external systems (chart surface, record sources).

pub mod html;
pub mod source;
