//! Configuration modules for the Markbook API.
//!
//! Each submodule handles one aspect of configuration, loaded from
//! environment variables with sensible development defaults.

pub mod cors;
pub mod database;
pub mod jwt;
