// crates/colloquy-core/src/runtime/validate.rs
// ============================================================================
// Module: Colloquy Validation
// Description: Ordered validator execution with first-failure-wins semantics.
// Purpose: Convert validator verdicts into act payloads deterministically.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Validators run in configuration order and the first failing verdict wins;
//! later validators are not consulted. Validator errors are distinct from
//! rejection verdicts and propagate as-is with no implicit retry.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::acts::ValidationFailure;
use crate::core::input::SlotValue;
use crate::interfaces::QueryContext;
use crate::interfaces::ValidationVerdict;
use crate::interfaces::ValidatorError;
use crate::interfaces::ValueValidator;

// ============================================================================
// SECTION: Validator Execution
// ============================================================================

/// Runs every validator in order and returns the first failure, if any.
///
/// # Errors
///
/// Propagates the first [`ValidatorError`] raised by a validator.
pub fn first_failure(
    validators: &[Box<dyn ValueValidator>],
    value: &SlotValue,
    ctx: &QueryContext,
) -> Result<Option<ValidationFailure>, ValidatorError> {
    for validator in validators {
        match validator.validate(value, ctx)? {
            ValidationVerdict::Pass => {}
            ValidationVerdict::Fail {
                reason_code,
                rendered_reason,
            } => {
                return Ok(Some(ValidationFailure {
                    reason_code,
                    rendered_reason,
                }));
            }
        }
    }
    Ok(None)
}
