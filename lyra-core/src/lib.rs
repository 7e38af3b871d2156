//! # lyra-core
//!
//! Shared traits and error types for the Lyra workspace.
//!
//! This crate defines the seam between the pipeline and the external
//! text-generation capability: the [`Llm`] trait. Concrete clients
//! (OpenAI, mocks) live in `lyra-model`; everything downstream depends
//! only on the trait.

mod error;
mod llm;

pub use error::{CoreError, Result};
pub use llm::{GenerationOptions, Llm};
