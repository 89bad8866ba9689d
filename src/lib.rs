//! Sleep and nutrition log ingestion.
//!
//! A daily markdown log is parsed into a Day → Meal → Item hierarchy
//! ([`parser`], [`models`]), kept in a local SQLite store ([`db`]), pushed to
//! a remote REST store ([`sync`], [`remote`]) and served back as nested JSON
//! for the dashboard ([`aggregate`], [`server`]).

pub mod aggregate;
pub mod config;
pub mod db;
pub mod models;
pub mod parser;
pub mod remote;
pub mod server;
pub mod sync;
