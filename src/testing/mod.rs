//! Test and demo harness utilities.
//!
//! Synthetic recordings with a known number of steps, used by the unit and
//! integration tests and by the `synth` CLI subcommand.

pub mod synthetic;

pub use synthetic::SyntheticWalk;
