//! Device OAuth redirect handoff (alldone) library crate.
//!
//! Receives an identity provider callback carrying `code` and `state`, reads
//! the local-network device target embedded in `state`, and answers with a
//! page that sends the browser on to the device with the code attached.

pub mod config;
pub mod errors;
pub mod handoff;
pub mod http;
pub mod templates;
