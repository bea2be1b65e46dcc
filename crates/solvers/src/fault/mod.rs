//! Data structures, types, and the bisection solver implementation for the fault dispute game.

mod error;
pub use error::{FaultError, FaultResult};

mod position;
pub use position::{compute_gindex, try_gindex, Gindex, Position, MAX_GAME_DEPTH};

mod types;
pub use types::*;

mod provider;
pub use provider::TraceProvider;

mod alphabet;
pub use alphabet::{alphabet_claim, alphabet_preimage, AlphabetTraceProvider};

mod solver;
pub use solver::FaultSolver;

mod bisection;
pub use bisection::BisectionSolver;
