pub mod serialization;

pub use serialization::{as_script_tag, graph_envelope};
