//! Process-wide index cache.
//!
//! The corpus is static per deployment, so the index is loaded at most
//! once per process lifetime and shared. First access loads; concurrent
//! first accesses are serialized by the one-shot cell (losers wait and
//! reuse); later calls return the cached handle. There is no invalidation
//! path and none is needed.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::error::Result;
use crate::index::ChunkIndex;

static INDEX: OnceCell<Arc<ChunkIndex>> = OnceCell::const_new();

/// Load the persisted index from `dir`, or return the cached handle.
///
/// Idempotent and race-safe: if multiple callers race on first use, one
/// performs the load and the rest await its result.
///
/// # Errors
///
/// Propagates [`RagError::IndexNotBuilt`](crate::RagError::IndexNotBuilt)
/// or [`RagError::Index`](crate::RagError::Index) from the underlying load.
/// A failed load is not cached; the next caller retries.
pub async fn load_or_init(dir: &Path) -> Result<Arc<ChunkIndex>> {
    let index = INDEX
        .get_or_try_init(|| async { ChunkIndex::load(dir).map(Arc::new) })
        .await?;
    Ok(Arc::clone(index))
}
