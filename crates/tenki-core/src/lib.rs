//! Core types and trait definitions for the tenki forecast viewer.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! It owns the area taxonomy, forecast payload parsing, the cascading
//! selection state machine and the text rendering of a forecast.

pub mod area;
pub mod error;
pub mod forecast;
pub mod render;
pub mod selection;
pub mod store;
pub mod taxonomy;

pub use error::{Error, Result};
