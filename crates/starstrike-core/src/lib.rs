//! Core types and definitions for STARSTRIKE.
//!
//! This crate defines the vocabulary shared across all other crates:
//! identifiers, components, commands, state snapshots, events, errors
//! and constants. It has no dependency on any runtime or presentation layer.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;
