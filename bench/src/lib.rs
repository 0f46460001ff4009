//! Benchmark utilities for switchboard.
//!
//! This crate provides the message types and workloads the benchmarks share:
//!
//! - **Microbenchmarks**: single operations in isolation (subscribe, fan-out, request dispatch)
//! - **Scenario benchmarks**: mixed workloads with subscriber churn
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench -p switchboard_bench
//!
//! # Run specific benchmark group
//! cargo bench -p switchboard_bench -- fan_out
//! ```
//!
//! Results are written to `target/criterion/` with HTML reports for visualization.

pub mod messages;
pub mod scenarios;
