//! Chat relay for the Gemini generative-language API.
//!
//! A single `POST /api/gemini` route forwards one user message to the provider
//! and returns the first text part of the reply. The [`client`] module holds the
//! conversation side: message history, submit guard and the HTTP transport.

// Strict ban on unsafe or non-idiomatic patterns
#![deny(warnings)] // Every warning is an error
#![deny(unsafe_code)] // No unsafe code
#![deny(missing_docs)] // Every public item must be documented
#![deny(dead_code)] // No unused code
#![deny(non_camel_case_types)]
// Types follow CamelCase

// Nothing slips through
#![deny(unused_imports)] // No unused imports
#![deny(unused_variables)] // No unused variables
#![deny(unused_must_use)] // Results and Options must be handled
#![deny(non_snake_case)] // Functions and variables are snake_case
#![deny(non_upper_case_globals)] // Constants and globals are UPPER_CASE
#![deny(nonstandard_style)] // No non-standard style
#![forbid(unsafe_op_in_unsafe_fn)]
// No unsafe even inside an unsafe fn

// Clippy
#![deny(clippy::all)] // All standard Clippy lints
#![deny(clippy::pedantic)] // Strict Clippy lints
#![deny(clippy::nursery)] // Experimental lints
#![deny(clippy::unwrap_used)] // No unwrap()
#![deny(clippy::expect_used)] // No expect()
#![deny(clippy::panic)] // No panic!()
#![deny(clippy::print_stdout)] // No println!() in library code
#![deny(clippy::todo)] // No todo!()
#![deny(clippy::unimplemented)] // No unimplemented!()
#![deny(clippy::missing_const_for_fn)] // const wherever possible
#![deny(clippy::unwrap_in_result)] // No unwrap() inside Result functions
#![deny(clippy::module_inception)] // No module named after its parent
#![deny(clippy::redundant_clone)] // No needless clones
#![deny(clippy::shadow_unrelated)] // No shadowing with unrelated values
#![deny(clippy::too_many_arguments)] // Bounded argument lists
#![deny(clippy::cognitive_complexity)] // Bounded function complexity

// Robustness
#![deny(overflowing_literals)] // No overflowing literals

/// Chat client: conversation state, submit guard and relay transport.
#[allow(
    clippy::missing_const_for_fn,
    clippy::option_if_let_else,
    clippy::significant_drop_tightening,
    clippy::future_not_send
)]
pub mod client;
/// Startup configuration and the per-request credential source.
pub mod config;
/// Generative-text provider abstraction and the Gemini client.
#[allow(clippy::missing_const_for_fn)]
pub mod provider;
/// HTTP server and the relay route.
#[allow(
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::unused_async
)]
pub mod server;
/// Entry helpers to start the relay server.
pub mod start_relay;
