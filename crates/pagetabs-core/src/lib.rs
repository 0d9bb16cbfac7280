pub mod config;
pub mod error;
pub mod images;
pub mod indicator;
pub mod measure;
pub mod tabs;

pub use config::{AppConfig, EasingType, ScrollConfig};
pub use error::{Error, Result};
pub use indicator::{IndicatorFrame, IndicatorGeometry};
pub use measure::{BoundingBox, MeasurementRegistry, Measurements, PendingMeasurements};
pub use tabs::{TabEntry, TabKey, TabSet};
