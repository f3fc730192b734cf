//! ODDSLIP — Odds Engine & Bet-Slip State Machine
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod odds;
pub mod book;
pub mod slip;
pub mod feed;
