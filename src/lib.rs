//! Acronym Puzzles
//!
//! Game core for acronym sentence puzzles: a player sees an acronym and a
//! clue and guesses the hidden sentence. The crate scores guesses word by
//! word, pages through a category's levels, draws random endless batches,
//! picks the daily puzzle and keeps endless high scores.
//!
//! # Quick Start
//!
//! ```rust
//! use acronym_puzzles::core::WordAccuracy;
//! use acronym_puzzles::engine::evaluate_guess;
//!
//! let result = evaluate_guess("Lions Tigers Monkeys Elephants", "lions tigers monkey elephants");
//! assert_eq!(result.word_results[2], WordAccuracy::WrongLocation);
//! assert!(result.score < 1.0);
//! ```

// Core domain types
pub mod core;

// Game rules
pub mod engine;

// Repository traits and the in-memory store
pub mod store;

// Bearer-token authentication
pub mod auth;

// Request handlers
pub mod service;

// Runtime settings
pub mod config;

// Log setup
pub mod logging;

// Command implementations
pub mod commands;

// Terminal output formatting
pub mod output;
