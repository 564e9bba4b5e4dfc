pub mod web;

use crate::error::Result;
use sha2::{Digest, Sha256};

pub use web::WebAlbum;

/// Opaque fingerprint of the rendered content at one point in time.
///
/// Only ever compared for equality; the digest itself carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageState(String);

impl PageState {
    /// Fingerprint a snapshot of rendered content
    pub fn of(content: &str) -> Self {
        Self(hex::encode(Sha256::digest(content.as_bytes())))
    }
}

/// A lazily-loading view of album items.
///
/// All operations are driven sequentially by a single caller, so
/// implementations may hold whatever session state they need in `&mut self`.
#[allow(async_fn_in_trait)]
pub trait ContentSource {
    /// Fingerprint the content as currently rendered
    async fn fingerprint(&mut self) -> Result<PageState>;

    /// Apply one incremental-load trigger
    async fn advance(&mut self) -> Result<()>;

    /// Return to the initial view, discarding any scroll position
    async fn reset(&mut self) -> Result<()>;

    /// Enumerate the currently loaded items and return how many there are
    async fn loaded_items(&mut self) -> Result<usize>;

    /// Select the item at `index` (as enumerated by `loaded_items`) and trigger its download
    async fn download_item(&mut self, index: usize) -> Result<()>;
}
