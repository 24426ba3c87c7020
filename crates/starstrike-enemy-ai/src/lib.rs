//! Enemy behavior for STARSTRIKE.
//!
//! Per-type behavior profiles (the movement policy table), trajectory
//! generators, and the enemy health state machine. Pure functions over
//! plain data; no ECS or scheduling dependency.

pub mod fsm;
pub mod profiles;
pub mod trajectory;

pub use starstrike_core as core;
