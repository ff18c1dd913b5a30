pub mod config;
pub mod core;
pub mod extraction;
pub mod fetch;
pub mod persistence;
pub mod schema;
pub mod utils;

pub use crate::core::{
    GenerateRequest, GraphOverrides, SchemaContext, SchemaError, SchemaGenerator, SchemaRecord,
};
pub use crate::fetch::{FetchedPage, HttpFetcher, PageFetcher};
pub use crate::schema::SchemaType;
