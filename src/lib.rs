//! `handcricket` — a hand-cricket match engine
//!
//! One actor task per match owns all match state; digits arrive over
//! typed ports, deadlines over epoch-guarded timers, and everything the
//! engine says leaves as a typed event stream. The CLI can run scripted
//! scenarios or interactive matches on top of the same engine.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod observability;
pub mod ports;
pub mod registry;
pub mod scenario;
