pub mod context;
pub mod error;
pub mod generator;

pub use context::{ExtractionSummary, GraphOverrides, SchemaContext, SchemaRecord};
pub use error::SchemaError;
pub use generator::{build_from_html, GenerateRequest, SchemaGenerator};
