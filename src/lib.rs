//! # Roster Bot
//!
//! A Telegram group bot that remembers the members it sees, mentions all of
//! them on request and posts ad-hoc and recurring polls into forum topics.
//!
//! ## Features
//! - Passive member tracking from messages and join events
//! - `/all` mention broadcast, paginated
//! - Ad-hoc polls with optional anonymity and mention-first announcement
//! - Recurring poll presets on weekly or monthly triggers
//! - JSON roster file with atomic writes and one-time import
//! - Keep-alive HTTP endpoint

/// Bot commands, dispatcher schema and passive tracking
pub mod bot;
/// Configuration from environment variables
pub mod config;
/// Error types per concern
pub mod error;
/// Chat platform boundary and its Telegram implementation
pub mod platform;
/// Member roster model, file store and import
pub mod roster;
/// Broadcast, poll composition, scheduling and keep-alive services
pub mod services;
/// Utility functions for formatting, pagination, validation and dates
pub mod utils;
