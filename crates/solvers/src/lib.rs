//! Solvers for interactive fault dispute games.
//!
//! Given a claim in a dispute and a [fault::TraceProvider] for the canonical execution trace, a
//! [fault::FaultSolver] decides the next bisection move against it, or, once the dispute has been
//! narrowed to a single instruction, the data needed to step against it onchain.

pub mod fault;
