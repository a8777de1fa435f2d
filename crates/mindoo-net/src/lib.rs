#![doc = include_str!("../README.md")]

//! Net model layer.
//!
//! This crate owns everything the doom search knows about the input net
//! itself: reading and writing the low-level text format, fast-forwarding
//! the initial marking, validating bad markings against place names, and
//! reading the event count from a prefix file header.

pub mod errors;
pub mod marking;
pub mod mci;
pub mod net;
