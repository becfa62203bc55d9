// Recipe corpus loading
// Turns the raw dataset into normalized, indexable documents

pub mod document;
pub mod loader;

// Re-exports
pub use document::{Document, DocumentMetadata, RecipeRecord};
pub use loader::{load, load_file, load_str};
