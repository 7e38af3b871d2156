//! # lyra-model
//!
//! [`Llm`](lyra_core::Llm) implementations for the Lyra pipeline:
//!
//! - [`OpenAIResponsesClient`] — production client for the OpenAI
//!   Responses API
//! - [`MockLlm`] — scripted client for deterministic pipeline tests

pub mod mock;
pub mod openai;

pub use mock::MockLlm;
pub use openai::OpenAIResponsesClient;
