//! Dealflow - matching-interaction controller for the investor/startup marketplace
//!
//! This library keeps the displayed candidate lists and introductions of one
//! session consistent with the remote system of record while the user passes,
//! watches, and requests or answers introductions.

pub mod config;
pub mod core;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use core::{
    DispatchOutcome, ErrorKind, FetchOutcome, InteractionError, MatchController, ReadPath,
    UserAction,
};
pub use models::{CandidateMatch, InterestDecision, Introduction, ListId, SearchFilters};
pub use services::{GatewayError, HttpGateway, MatchGateway};
