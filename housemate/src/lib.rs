//! # HouseMate
//!
//! A home model (houses, rooms, sensors, appliances, occupants and their
//! statuses) kept entirely in a [`knowledge_engine`] graph and driven by a
//! line-oriented command language.
//!
//! ## Core Components
//!
//! - **model**: Entity definitions and status value rules
//! - **service**: Creates entities and records their relationships as triples
//! - **command**: Parses command lines and applies them to the service
//! - **config**: Session settings, loadable from TOML

pub mod command;
pub mod config;
pub mod error;
pub mod model;
pub mod service;

pub use command::*;
pub use config::*;
pub use error::*;
pub use model::*;
pub use service::*;
