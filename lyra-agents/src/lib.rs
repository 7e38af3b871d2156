//! # lyra-agents
//!
//! The multi-stage research pipeline over the Lyra retrieval layer.
//!
//! A run moves a [`PipelineState`] through six stages:
//!
//! ```text
//! start → planned → researched → analyzed → drafted → validated → edited(final)
//! ```
//!
//! The planner decomposes the question into retrieval sub-queries; the
//! researcher turns retrieved passages into schema-validated
//! [`EvidenceItem`]s; the synthesis stages (analyst, writer, validator,
//! editor) transform evidence into a final report in which every claim
//! traces back to an evidence item. Validation is strictly subtractive
//! and editing purely stylistic, so style polish can never reintroduce
//! unsupported content.
//!
//! Each stage is a public function over the shared state, so any stage can
//! be exercised in isolation with a hand-constructed prior state.

pub mod error;
pub mod evidence;
pub mod pipeline;
pub mod stages;
pub mod state;

pub use error::{AgentError, Result};
pub use evidence::EvidenceItem;
pub use pipeline::ResearchPipeline;
pub use state::PipelineState;
