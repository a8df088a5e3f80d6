//! Core domain logic for the video catalog.
//!
//! Everything here is transport- and database-agnostic: the HTTP crate feeds
//! untrusted parameters in, the persistence crate implements the store traits.

pub mod access;
pub mod catalog;
pub mod error;
pub mod filter;
pub mod pagination;
pub mod store;
pub mod types;
pub mod user;
pub mod video;
