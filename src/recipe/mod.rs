// Recipe records: raw source shapes, normalization and the ingredient vocabulary

pub mod normalize;
pub mod raw;
pub mod source;
pub mod vocabulary;

use serde::{Deserialize, Serialize};

// Re-exports
pub use normalize::normalize;
pub use raw::{Field, RawCollection, RawRecipe};
pub use source::{Loader, RecipeSource};
pub use vocabulary::Vocabulary;

/// A recipe in its uniform shape, built once at load time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub title: String,
    pub image: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    /// Steps as one blob, used when there is no step list and for speech
    pub instructions: String,
}
