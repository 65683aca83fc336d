//! Event verification.
//!
//! [`heuristic`] is the pure decision table mapping an event type to a
//! satellite index query and a threshold verdict. [`Verifier`] runs it for a
//! stored event and writes the outcome back.

pub mod heuristic;
pub mod runner;

pub use heuristic::{decide, plan, unsupported, Plan};
pub use runner::Verifier;
