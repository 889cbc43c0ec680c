//! Data models for the dispatch pipeline.

pub mod config;
pub mod customer;
pub mod delivery;
