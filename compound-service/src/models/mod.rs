//! Request, prompt and result types for compound lookups.

pub mod compound;
pub mod prompt;

pub use compound::{CompoundData, CompoundRequest, GenerationResult, StructurePayload};
pub use prompt::GenerationPrompt;
