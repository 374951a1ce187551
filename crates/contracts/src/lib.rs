//! Shared types for the booking backend and its clients.
//!
//! Nothing in this crate performs I/O: aggregates, DTOs, search state and
//! the listing wizards live here so that every side validates the same way.

pub mod domain;
pub mod shared;
pub mod usecases;
