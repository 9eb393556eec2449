//! vidmeta: turns a free-form video description (any language) into validated YouTube metadata.
//!
//! The core is [`metadata::pipeline::MetadataPipeline`]; the HTTP surface in [`routes`] is a
//! thin shell over it.

pub mod config;
pub mod errors;
pub mod llm_client;
pub mod metadata;
pub mod routes;
pub mod state;
