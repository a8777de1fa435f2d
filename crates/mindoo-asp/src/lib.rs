#![doc = include_str!("../README.md")]

//! Answer-set solving for unfolding prefixes.
//!
//! This crate provides the term and fact layer shared by every query of the
//! doom search, the closed decoder for the fact/predicate contract, and
//! pluggable clingo backends behind the [`solver::AspSolver`] trait.

pub mod backends;
pub mod decode;
pub mod facts;
pub mod solver;
pub mod symbol;
