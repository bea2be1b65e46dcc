//! The error module contains the [FaultError] type returned by the position arithmetic and the
//! solvers.

use super::Gindex;
use thiserror::Error;

/// The [FaultError] enum describes every way a solver or a position operation can fail.
///
/// [FaultError::Provider] is the only variant that may be transient; all other variants signal a
/// contract violation by the caller and should be treated as bugs.
#[derive(Debug, Error)]
pub enum FaultError {
    /// An operation that requires a deeper (or shallower) position was invoked on a position that
    /// cannot support it, e.g. asking for the children of a leaf.
    #[error("invalid depth for position {gindex} in a tree of max depth {max_depth}: {reason}")]
    InvalidDepth {
        /// The generalized index the operation was invoked on.
        gindex: Gindex,
        /// The maximum depth of the game tree.
        max_depth: u64,
        /// Why the operation is not defined at this depth.
        reason: &'static str,
    },
    /// A `(depth, index_at_depth)` pair does not identify a node of the game tree.
    #[error("position ({depth}, {index_at_depth}) does not exist in a tree of max depth {max_depth}")]
    InvalidPosition {
        /// The requested depth.
        depth: u64,
        /// The requested index at depth.
        index_at_depth: u64,
        /// The maximum depth of the game tree.
        max_depth: u64,
    },
    /// The requested maximum depth is not supported.
    #[error("max depth {0} exceeds the supported maximum game depth")]
    InvalidMaxDepth(u64),
    /// A claim's parent does not sit directly above it in the game tree.
    #[error("claim at position {position} cannot respond to a parent at position {parent}")]
    InvalidParent {
        /// The position of the responding claim.
        position: Gindex,
        /// The position of the claim it claims to respond to.
        parent: Gindex,
    },
    /// The trace provider could not supply a commitment, preimage or proof.
    #[error("trace provider failed at trace index {index}: {source}")]
    Provider {
        /// The trace index that was requested.
        index: u64,
        #[source]
        source: anyhow::Error,
    },
    /// A step was attempted against a claim above the leaf level.
    #[error("cannot step against a claim at depth {depth}; steps are only valid at depth {max_depth}")]
    NotAtMaxDepth {
        /// The depth of the claim.
        depth: u64,
        /// The maximum depth of the game tree, where steps happen.
        max_depth: u64,
    },
    /// A step was attempted against a claim at a level the solver already agrees with.
    #[error("cannot step against a claim at a level we agree with")]
    AlreadyAgreed,
}

impl FaultError {
    /// Returns `true` if the error originated in the trace provider and may succeed on retry.
    pub fn is_provider_error(&self) -> bool {
        matches!(self, Self::Provider { .. })
    }
}

/// A [Result] alias with [FaultError] as the error type.
pub type FaultResult<T> = Result<T, FaultError>;
