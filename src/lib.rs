//! Linkwarden server library.
//!
//! A self-hosted bookmark manager: users collect links into collections,
//! share collections with team members or publicly, and the stored archive
//! artifacts of each link can be reset for re-preservation.

// Allow raw string hashes for safety - they're harmless and prevent issues if content changes
#![allow(clippy::needless_raw_string_hashes)]

pub mod api;
pub mod auth;
pub mod components;
pub mod config;
pub mod db;
pub mod permission;
pub mod storage;
pub mod web;
