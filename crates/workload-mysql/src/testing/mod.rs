//! Testing utilities for the MySQL driver
//!
//! This module provides Docker container management for MySQL integration tests.

pub mod container;

pub use container::MySQLContainer;
