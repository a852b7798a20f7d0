//! Database layer - connection pool, SQL construction and stores
//!
//! # Design Principles
//!
//! - Connection pool (max 5 connections) - no Arc<Mutex<Connection>>
//! - Parameterized statements only, built in `query`
//! - Unique index on school_name backs the service's name pre-check

pub mod pool;
pub mod migrations;
pub mod query;
pub mod repos;

pub use pool::create_pool;
pub use repos::*;
