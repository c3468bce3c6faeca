// ABOUTME: Configuration types shared across the workspace
// ABOUTME: Contains the sport profile registry consulted at session start

/// Sport profile registry with filtering and polling parameters
pub mod profiles;

pub use profiles::{profile_for, SportProfile};
