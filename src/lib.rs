//! Verification of SAML federation entities.
//!
//! Every configured entity is run through a fixed set of suites. A suite is
//! an ordered list of tests that stops at the first failure; failing suites
//! are handed to a [`output::Reporter`]. Configured metadata is validated by
//! walking it as a tree of [`validation::Node`]s.

pub mod blacklist;
pub mod cli;
pub mod config;
pub mod context;
pub mod entity;
pub mod error;
pub mod http;
pub mod model;
pub mod name;
pub mod output;
pub mod parsers;
pub mod result;
pub mod runner;
pub mod source;
pub mod suite;
pub mod suites;
pub mod validation;
pub mod violation;

#[cfg(test)]
pub(crate) mod testing;
