// system-tests/src/lib.rs
// ============================================================================
// Module: Colloquy System Tests Library
// Description: Shared harness and helpers for system test scenarios.
// Purpose: Provide common utilities for Colloquy system-test binaries.
// Dependencies: colloquy-core
// ============================================================================

//! ## Overview
//! This crate hosts the shared dialogue harness used by the Colloquy
//! system-tests binaries in `system-tests/tests`. The harness drives the
//! public engine API only, one resolved input per turn, the way an external
//! router would.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod harness;
