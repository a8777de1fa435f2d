#![doc = include_str!("../README.md")]

//! Doom-search engine.
//!
//! Builds the event poset and the extended prefix of a net, then runs the
//! worklist fixpoint that enumerates minimal doomed configurations.

pub mod dot;
pub mod errors;
pub mod event;
pub mod oracle;
pub mod pi1;
pub mod pipeline;
pub mod poset;
pub mod reach;
pub mod report;
pub mod rules;
pub mod search;
pub mod shave;
pub mod workspace;
