//! Core types and shared functionality for sdamgia.
//!
//! This crate provides:
//! - Unified error types
//! - Configuration structures
//! - The subject registry
//! - Problem and catalog records

pub mod config;
pub mod error;
pub mod model;
pub mod subject;

pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use model::{Catalog, Category, Problem, ProblemPart, Topic, find_topic};
pub use subject::{SubjectRegistry, origin_str};
