//! The alphabet module contains an implementation of the [TraceProvider] trait for the
//! alphabet fault dispute game, where each trace element is a single letter.

use super::{Commitment, FaultError, TraceProvider, MAX_GAME_DEPTH};
use anyhow::{anyhow, ensure, Result};
use ethers::{
    abi::{self, Token},
    types::{Bytes, U256},
    utils::keccak256,
};
use std::sync::Arc;

/// Builds the preimage of the alphabet trace element `letter` at `index`: the ABI encoding of
/// `(uint256 index, uint256 letter)`.
pub fn alphabet_preimage(index: u64, letter: u8) -> Bytes {
    abi::encode(&[Token::Uint(U256::from(index)), Token::Uint(U256::from(letter))]).into()
}

/// Computes the commitment to the alphabet trace element `letter` at `index`.
pub fn alphabet_claim(index: u64, letter: u8) -> Commitment {
    Commitment::from(keccak256(alphabet_preimage(index, letter)))
}

/// The [AlphabetTraceProvider] serves an execution trace made of letters.
///
/// Traces shorter than `2^{max_depth}` are padded with their last letter.
#[derive(Debug, Clone)]
pub struct AlphabetTraceProvider {
    /// Our full execution trace.
    trace: Arc<[u8]>,
    /// The maximum depth of the game tree the trace is played in.
    max_depth: u64,
}

impl AlphabetTraceProvider {
    /// Creates a new [AlphabetTraceProvider].
    ///
    /// ### Takes
    /// - `trace`: The letters of the trace, in order. Must not be empty.
    /// - `max_depth`: The maximum depth of the game tree.
    ///
    /// ### Returns
    /// - `Ok(AlphabetTraceProvider)`: The provider.
    /// - `Err(anyhow::Error)`: The trace is empty, longer than the tree's leaf level, or
    ///    `max_depth` is unsupported.
    pub fn new(trace: impl AsRef<[u8]>, max_depth: u64) -> Result<Self> {
        let trace = trace.as_ref();
        if max_depth > MAX_GAME_DEPTH {
            return Err(FaultError::InvalidMaxDepth(max_depth).into());
        }
        ensure!(!trace.is_empty(), "Alphabet trace must not be empty");
        ensure!(
            (trace.len() as u128) <= 1u128 << max_depth,
            "Alphabet trace of length {} does not fit a tree of depth {}",
            trace.len(),
            max_depth
        );

        Ok(Self {
            trace: Arc::from(trace),
            max_depth,
        })
    }

    /// Returns the maximum depth of the game tree the trace is played in.
    pub fn max_depth(&self) -> u64 {
        self.max_depth
    }

    /// Returns the letter at `index`, padding past the end of the trace with its last letter.
    pub fn state_at(&self, index: u64) -> Result<u8> {
        if index as u128 >= 1u128 << self.max_depth {
            tracing::trace!(target: "alphabet-provider", "Rejected out of range trace index {}", index);
            return Err(anyhow!(
                "Invalid trace index {} for a tree of depth {}",
                index,
                self.max_depth
            ));
        }

        let last = self.trace.len() - 1;
        Ok(self.trace[usize::try_from(index).map_or(last, |i| i.min(last))])
    }
}

impl TraceProvider for AlphabetTraceProvider {
    fn state_hash(&self, index: u64) -> Result<Commitment> {
        Ok(alphabet_claim(index, self.state_at(index)?))
    }

    fn preimage_at(&self, index: u64) -> Result<(Bytes, Bytes)> {
        Ok((alphabet_preimage(index, self.state_at(index)?), Bytes::default()))
    }

    fn absolute_prestate(&self) -> Bytes {
        // The letter preceding the first element of the trace, e.g. '`' for "abc...".
        abi::encode(&[Token::Uint(U256::from(self.trace[0].wrapping_sub(1)))]).into()
    }
}
