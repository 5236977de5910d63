//! Test utilities for deterministic search tests.
//!
//! This module provides a scripted random source and a scripted oracle so
//! mutation outcomes and measurements can be fixed in advance without
//! spawning any external tool.
