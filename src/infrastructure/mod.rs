//! Infrastructure Layer
//!
//! Implementations of the domain contracts:
//! - PostgreSQL pool, migrations and repositories
//! - In-memory store backing every repository trait
//! - Prometheus metrics

pub mod database;
pub mod memory;
pub mod metrics;
pub mod repositories;
