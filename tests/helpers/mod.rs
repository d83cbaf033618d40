//! Test helpers module
//!
//! Utilities shared by the integration tests: a disposable PostgreSQL database
//! and convenience constructors for the store's components.

#![allow(dead_code)]

pub mod database_helper;

pub use database_helper::*;
