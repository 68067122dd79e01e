// Library exports for the binary and integration tests
pub mod config;
pub mod error;
pub mod lua_scripts;
pub mod models;
pub mod redis;
pub mod repository;
pub mod routes;
pub mod service;
pub mod validation;

pub use crate::config::*;
pub use crate::error::*;
pub use crate::models::*;
pub use crate::repository::{RedisRepository, ThoughtStorage};
pub use crate::service::*;
