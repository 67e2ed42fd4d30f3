// crates/colloquy-core/src/runtime/paging.rs
// ============================================================================
// Module: Colloquy Pagination
// Description: Deterministic windowing of a candidate list into spoken pages.
// Purpose: Fix the spoken-page slice independently of the candidate count.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Spoken pages are fixed-size windows over the full candidate list. The page
//! index persists across turns and is never advanced by this core; advancing
//! pages is an external "show more" capability. Windows clamp to the list
//! length, so an index past the end yields an empty page rather than an
//! error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::identifiers::CandidateId;

// ============================================================================
// SECTION: Windowing
// ============================================================================

/// Returns the spoken window `all[index*size .. (index+1)*size]`, clamped.
#[must_use]
pub fn spoken_window(all: &[CandidateId], page_index: u64, page_size: u64) -> &[CandidateId] {
    let len = u64::try_from(all.len()).unwrap_or(u64::MAX);
    let start = page_index.saturating_mul(page_size).min(len);
    let end = start.saturating_add(page_size).min(len);
    let start = usize::try_from(start).unwrap_or(all.len());
    let end = usize::try_from(end).unwrap_or(all.len());
    &all[start .. end]
}

/// Resolves a 1-based position within a slice of candidates.
#[must_use]
pub fn resolve_position(candidates: &[CandidateId], position: u64) -> Option<&CandidateId> {
    if position == 0 {
        return None;
    }
    let index = usize::try_from(position - 1).ok()?;
    candidates.get(index)
}
