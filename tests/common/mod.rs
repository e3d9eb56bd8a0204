//! Common test utilities for skystrip.
//!
//! This module provides shared utilities for testing the daemon pipeline.

pub mod test_data;
