//! The bisection module contains [BisectionSolver], the stateless implementation of the
//! [FaultSolver] trait.

use super::{
    Claim, ClaimData, Commitment, Decision, FaultError, FaultResult, FaultSolver, Position,
    StepData, TraceProvider, MAX_GAME_DEPTH,
};
use ethers::types::Bytes;

/// The [BisectionSolver] narrows a dispute one level at a time until it reaches a single
/// instruction, always asserting the commitments of its own [TraceProvider].
///
/// The solver keeps no state between calls and may be shared between threads.
#[derive(Debug, Clone)]
pub struct BisectionSolver<P> {
    /// The maximum depth of the game tree.
    max_depth: u64,
    /// The source of the canonical trace.
    provider: P,
}

impl<P: TraceProvider> BisectionSolver<P> {
    /// Creates a new [BisectionSolver].
    ///
    /// ### Takes
    /// - `max_depth`: The maximum depth of the game tree.
    /// - `provider`: The [TraceProvider] backing the solver.
    ///
    /// ### Returns
    /// - `Ok(BisectionSolver)`: The solver.
    /// - `Err(FaultError::InvalidMaxDepth)`: `max_depth` exceeds [MAX_GAME_DEPTH].
    pub fn new(max_depth: u64, provider: P) -> FaultResult<Self> {
        if max_depth > MAX_GAME_DEPTH {
            return Err(FaultError::InvalidMaxDepth(max_depth));
        }
        Ok(Self {
            max_depth,
            provider,
        })
    }

    /// Returns a reference to the solver's [TraceProvider].
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Fetches the local commitment at `index`.
    fn state_hash(&self, index: u64) -> FaultResult<Commitment> {
        self.provider
            .state_hash(index)
            .map_err(|source| FaultError::Provider { index, source })
    }

    /// Fetches the local preimage and proof at `index`.
    fn preimage_at(&self, index: u64) -> FaultResult<(Bytes, Bytes)> {
        self.provider
            .preimage_at(index)
            .map_err(|source| FaultError::Provider { index, source })
    }
}

impl<P: TraceProvider> FaultSolver for BisectionSolver<P> {
    fn max_depth(&self) -> u64 {
        self.max_depth
    }

    fn decide(&self, claim: &ClaimData) -> FaultResult<Decision> {
        self.checked_depth(claim.position)?;
        let local = self.state_hash(claim.trace_index(self.max_depth))?;
        Ok(Decision::from_commitments(&local, &claim.value))
    }

    fn counter(&self, claim: &ClaimData, decision: Decision) -> FaultResult<ClaimData> {
        let position = match decision {
            Decision::Attack => claim.position.attack(self.max_depth)?,
            Decision::Defend => claim.position.defend(self.max_depth)?,
        };
        let value = self.state_hash(position.trace_index(self.max_depth))?;

        tracing::debug!(
            target: "fault-solver",
            "{:?} against claim at position {} (depth {}): moving to position {}",
            decision,
            claim.position,
            claim.depth(),
            position
        );
        Ok(ClaimData::new(value, position))
    }

    fn next_move(&self, claim: Claim, agree_with_claim_level: bool) -> FaultResult<Option<ClaimData>> {
        // Never counter an opening claim made from our own side of the game.
        if claim.is_root() && agree_with_claim_level {
            tracing::debug!(target: "fault-solver", "Not moving against root claim at a level we agree with");
            return Ok(None);
        }

        self.checked_depth(claim.data.position)?;
        // A response sits below either the parent itself (attack) or its right sibling (defend).
        if let Some(parent) = claim.parent {
            let above = claim.data.position.parent();
            if parent.position == 0 || (above != parent.position && above != parent.position | 1) {
                return Err(FaultError::InvalidParent {
                    position: claim.data.position,
                    parent: parent.position,
                });
            }
        }

        let decision = self.decide(&claim.data)?;
        self.counter(&claim.data, decision).map(Some)
    }

    fn attempt_step(&self, claim: Claim, agree_with_claim_level: bool) -> FaultResult<StepData> {
        let depth = self.checked_depth(claim.data.position)?;
        if depth != self.max_depth {
            return Err(FaultError::NotAtMaxDepth {
                depth,
                max_depth: self.max_depth,
            });
        }
        if agree_with_claim_level {
            return Err(FaultError::AlreadyAgreed);
        }

        let decision = self.decide(&claim.data)?;
        let index = claim.data.trace_index(self.max_depth);

        // An attack disputes the transition into the leaf, so the step starts from the state
        // before it. A defense disputes the transition out of the leaf.
        let (pre_state, proof_data) = match (decision, index) {
            (Decision::Attack, 0) => (self.provider.absolute_prestate(), Bytes::default()),
            (Decision::Attack, index) => self.preimage_at(index - 1)?,
            (Decision::Defend, index) => self.preimage_at(index)?,
        };

        tracing::debug!(
            target: "fault-solver",
            "{:?} step against leaf claim at trace index {}",
            decision,
            index
        );
        Ok(StepData {
            leaf_claim: claim,
            is_attack: decision.is_attack(),
            pre_state,
            proof_data,
        })
    }
}
