//! CLI command implementations.
//!
//! This module contains the implementation of each CLI command.

pub mod hex_utils;
pub mod map;
pub mod prefab;
pub mod search;
pub mod sector;
