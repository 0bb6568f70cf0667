//! Language catalogue: the validated source of truth for supported languages.
//!
//! # Architecture
//!
//! - `model`: configuration record types (serde data model for external documents)
//! - `source`: where raw records come from (static, file, HTTP)
//! - `registry`: validation, integrity gating, and immutable snapshot serving
//! - `defaults`: the baked-in catalogue used when no valid records load
//!
//! Records flow `source -> registry -> snapshot`; everything downstream
//! (classifier, façade) reads the snapshot only.

pub mod defaults;
mod model;
mod registry;
mod source;

pub use model::{
    CurrencyFormat, FormatterSet, Gender, GenderOption, LanguageConfig, MeasurementSystem,
    NumberFormat, RegionInfo,
};
pub use registry::LanguageRegistry;
pub use source::{ConfigSource, HttpConfigSource, JsonFileSource, StaticSource};
