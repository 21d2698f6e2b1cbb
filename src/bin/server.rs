//! Gemini relay server binary.
//! Run with: cargo run --bin gemini-relay-server

use std::process::ExitCode;

use gemini_relay::start_relay;

fn main() -> ExitCode {
    start_relay::run()
}
