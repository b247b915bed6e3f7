//! # xsdc Bench
//!
//! Synthetic schema generators for xsdc compile benchmarks.

pub mod schemas;
