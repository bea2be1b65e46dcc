//! The provider module holds the [TraceProvider] trait, the solvers' only source of truth about
//! the execution trace.

use super::Commitment;
use anyhow::Result;
use ethers::types::Bytes;
use std::sync::Arc;

/// The [TraceProvider] trait describes a source of the canonical execution trace for one kind of
/// computation. Solvers only ever read from a provider, so implementations must be safe to share
/// across threads; any caching is the implementation's concern.
pub trait TraceProvider: Send + Sync {
    /// Returns the commitment to the trace element at `index`.
    ///
    /// ### Takes
    /// - `index`: The trace index, within `[0, 2^{max_depth})`.
    ///
    /// ### Returns
    /// - `Ok(Commitment)`: The canonical commitment at `index`.
    /// - `Err(anyhow::Error)`: `index` is out of range or the trace is unavailable.
    fn state_hash(&self, index: u64) -> Result<Commitment>;

    /// Returns the preimage of the trace element at `index` along with any proof data needed to
    /// execute the step that starts from it.
    ///
    /// ### Takes
    /// - `index`: The trace index, within `[0, 2^{max_depth})`.
    ///
    /// ### Returns
    /// - `Ok((Bytes, Bytes))`: The preimage and the proof data.
    /// - `Err(anyhow::Error)`: `index` is out of range or the preimage is unavailable.
    fn preimage_at(&self, index: u64) -> Result<(Bytes, Bytes)>;

    /// Returns the preimage of the state before the first trace element.
    fn absolute_prestate(&self) -> Bytes;
}

impl<P: TraceProvider + ?Sized> TraceProvider for &P {
    fn state_hash(&self, index: u64) -> Result<Commitment> {
        (**self).state_hash(index)
    }

    fn preimage_at(&self, index: u64) -> Result<(Bytes, Bytes)> {
        (**self).preimage_at(index)
    }

    fn absolute_prestate(&self) -> Bytes {
        (**self).absolute_prestate()
    }
}

impl<P: TraceProvider + ?Sized> TraceProvider for Arc<P> {
    fn state_hash(&self, index: u64) -> Result<Commitment> {
        (**self).state_hash(index)
    }

    fn preimage_at(&self, index: u64) -> Result<(Bytes, Bytes)> {
        (**self).preimage_at(index)
    }

    fn absolute_prestate(&self) -> Bytes {
        (**self).absolute_prestate()
    }
}
