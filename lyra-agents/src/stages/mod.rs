//! Pipeline stages.
//!
//! Each stage is a free async function over the shared
//! [`PipelineState`](crate::PipelineState): it reads the fields it needs,
//! writes the single field it owns, and appends to the diagnostic trace.

pub mod analyst;
pub mod editor;
pub mod planner;
pub mod researcher;
pub mod validator;
pub mod writer;
