//! The types module contains all of the types relevant to the fault dispute game.

use super::{Gindex, Position};
use ethers::types::{Bytes, H256};
use serde::{Deserialize, Serialize};

/// A [Commitment] is an opaque 32 byte digest of the trace element(s) claimed at a position.
pub type Commitment = H256;

/// The [ClaimData] struct represents a [Commitment] made at a given [Position] in the game tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClaimData {
    /// The commitment to the trace at the position's trace index.
    pub value: Commitment,
    /// The position of the claim within the game tree.
    pub position: Gindex,
}

impl ClaimData {
    /// Creates a new [ClaimData].
    pub fn new(value: Commitment, position: Gindex) -> Self {
        Self { value, position }
    }

    /// Returns the depth of the claim within the game tree.
    pub fn depth(&self) -> u64 {
        self.position.depth()
    }

    /// Returns the trace index that the claim commits to.
    pub fn trace_index(&self, max_depth: u64) -> u64 {
        self.position.trace_index(max_depth)
    }
}

/// The [Claim] struct is a snapshot of a move in the dispute: the [ClaimData] itself and, for
/// every move but the opening one, the [ClaimData] it responds to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Claim {
    /// The claim being made.
    pub data: ClaimData,
    /// The claim that this claim responds to. `None` for the root claim.
    pub parent: Option<ClaimData>,
}

impl Claim {
    /// Creates the opening [Claim] of a dispute.
    pub fn root(data: ClaimData) -> Self {
        Self { data, parent: None }
    }

    /// Creates a [Claim] responding to `parent`.
    pub fn new(data: ClaimData, parent: ClaimData) -> Self {
        Self {
            data,
            parent: Some(parent),
        }
    }

    /// Returns `true` if the claim is the opening move of the dispute.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Returns the depth of the claim within the game tree.
    pub fn depth(&self) -> u64 {
        self.data.depth()
    }
}

/// The outcome of comparing a claim against the local trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    /// The claim disagrees with the local trace; dispute it directly.
    Attack,
    /// The claim agrees with the local trace; continue the search to its right.
    Defend,
}

impl Decision {
    /// Derives the [Decision] from the local commitment and the claimed commitment.
    pub fn from_commitments(local: &Commitment, claimed: &Commitment) -> Self {
        if local == claimed {
            Self::Defend
        } else {
            Self::Attack
        }
    }

    /// Returns `true` for [Decision::Attack].
    pub fn is_attack(&self) -> bool {
        matches!(self, Self::Attack)
    }
}

/// The [StepData] struct holds everything an onchain verifier needs to execute a single step
/// against a leaf claim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepData {
    /// The leaf claim being stepped against.
    pub leaf_claim: Claim,
    /// Whether the step disputes the leaf claim's value (`true`) or the state after it (`false`).
    pub is_attack: bool,
    /// The preimage of the state the step starts from.
    pub pre_state: Bytes,
    /// Provider-specific proof data accompanying the pre-state.
    pub proof_data: Bytes,
}

/// A [Response] is an action taken by a participant in the dispute game in response to
/// a claim made by another participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Response {
    /// Do nothing.
    DoNothing,
    /// Create a counter claim one level below the claim.
    Move(ClaimData),
    /// Perform a VM step against the leaf claim.
    Step(StepData),
}
