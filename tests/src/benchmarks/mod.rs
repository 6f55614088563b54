//! # Quantum-Chain Benchmarks
//!
//! Performance benchmarks per subsystem.
//! All benchmarks are "brutal" stress tests of the hot paths.

pub mod qc_17_proposal_handler;
