use thiserror::Error;

/// Failures surfaced to callers of the generation workflow.
///
/// Everything inside extraction, resolution and graph building is total;
/// only an unrecognized schema type and upstream fetch problems abort a
/// generation.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("unknown schema type: {0}")]
    UnknownSchemaType(String),

    #[error("failed to fetch {url}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}
