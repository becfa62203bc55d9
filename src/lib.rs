pub mod config;
pub mod error;

// Retrieval-augmented generation core
pub mod corpus;
pub mod embedding;
pub mod generation;
pub mod index;
pub mod pipeline;
pub mod prompt;
pub mod retriever;

// Outer surfaces
pub mod api;
pub mod cli;

// Re-exports
pub use config::Settings;
pub use error::{Error, Result};
pub use pipeline::Pipeline;
