//! Style Enforcement Tests
//!
//! Scans the workspace for patterns clippy does not flag on its own.
//!
//! - `lint_allowances` - Production code must not silence dead code or unused warnings

#[path = "style/lint_allowances.rs"]
mod lint_allowances;
