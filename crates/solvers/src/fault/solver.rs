//! The solver module holds the [FaultSolver] trait.

use super::{
    Claim, ClaimData, Decision, FaultError, FaultResult, Gindex, Position, Response, StepData,
};

/// The [FaultSolver] trait defines the interface for deciding the correct response to a single
/// [Claim] in a fault dispute game. Implementations hold no game state between calls.
pub trait FaultSolver {
    /// Returns the maximum depth of the game tree the solver plays in.
    fn max_depth(&self) -> u64;

    /// Returns the depth of `position`, failing with [FaultError::InvalidDepth] if it lies outside
    /// of the game tree.
    fn checked_depth(&self, position: Gindex) -> FaultResult<u64> {
        if position == 0 || position.depth() > self.max_depth() {
            return Err(FaultError::InvalidDepth {
                gindex: position,
                max_depth: self.max_depth(),
                reason: "position lies outside of the game tree",
            });
        }
        Ok(position.depth())
    }

    /// Compares a [ClaimData] against the local trace.
    ///
    /// ### Takes
    /// - `claim`: The claim to judge.
    ///
    /// ### Returns
    /// - `Ok(Decision)`: [Decision::Attack] if the local commitment differs from the claim's.
    /// - `Err(FaultError)`: The claim's position is outside of the tree, or the trace provider
    ///    failed.
    fn decide(&self, claim: &ClaimData) -> FaultResult<Decision>;

    /// Computes the counter claim for an already made [Decision] against a [ClaimData], one level
    /// below it.
    ///
    /// ### Takes
    /// - `claim`: The claim being countered.
    /// - `decision`: Whether to attack or defend the claim.
    ///
    /// ### Returns
    /// - `Ok(ClaimData)`: The counter claim, committing to the local trace.
    /// - `Err(FaultError)`: The move leaves the tree, or the trace provider failed.
    fn counter(&self, claim: &ClaimData, decision: Decision) -> FaultResult<ClaimData>;

    /// Computes the next bisection move against a [Claim].
    ///
    /// ### Takes
    /// - `claim`: The claim to respond to.
    /// - `agree_with_claim_level`: Whether the claim sits at a level of the tree the solver
    ///    supports.
    ///
    /// ### Returns
    /// - `Ok(Some(ClaimData))`: The counter claim, one level below the claim.
    /// - `Ok(None)`: The claim is a root claim at a level the solver agrees with.
    /// - `Err(FaultError)`: No move can be computed.
    fn next_move(&self, claim: Claim, agree_with_claim_level: bool) -> FaultResult<Option<ClaimData>>;

    /// Computes the data for a VM step against a leaf [Claim].
    ///
    /// ### Takes
    /// - `claim`: The leaf claim to step against.
    /// - `agree_with_claim_level`: Whether the claim sits at a level of the tree the solver
    ///    supports.
    ///
    /// ### Returns
    /// - `Ok(StepData)`: The data required to execute the step.
    /// - `Err(FaultError)`: The claim is not a leaf, the solver agrees with its level, or the
    ///    trace provider failed.
    fn attempt_step(&self, claim: Claim, agree_with_claim_level: bool) -> FaultResult<StepData>;

    /// Picks the appropriate [Response] to a [Claim]: a step at the leaf level, otherwise a move.
    /// A root claim that agrees with the local trace is left alone, as is any claim at a level the
    /// solver agrees with where no move is owed.
    fn respond(&self, claim: Claim, agree_with_claim_level: bool) -> FaultResult<Response> {
        let depth = self.checked_depth(claim.data.position)?;
        if depth == self.max_depth() {
            if agree_with_claim_level {
                return Ok(Response::DoNothing);
            }
            return self.attempt_step(claim, false).map(Response::Step);
        }

        if claim.is_root() {
            if agree_with_claim_level {
                return Ok(Response::DoNothing);
            }
            return match self.decide(&claim.data)? {
                Decision::Defend => Ok(Response::DoNothing),
                Decision::Attack => self
                    .counter(&claim.data, Decision::Attack)
                    .map(Response::Move),
            };
        }

        Ok(self
            .next_move(claim, agree_with_claim_level)?
            .map_or(Response::DoNothing, Response::Move))
    }
}
