//! Index Module
//!
//! Memory-mapped array of fixed-width entries: relative offset → store position.
//!
//! ## Responsibilities
//! - O(1) lookup of where record N starts in the store
//! - Reserve a fixed mapping at open, shrink the file to its content at close
//! - Signal "full" so the owner can rotate to a new segment
//!
//! ## File Format
//! ```text
//! ┌──────────────────────────────────────────┐
//! │ Entry 0                                  │
//! │ ┌──────────────────┬───────────────────┐ │
//! │ │ Offset (4, BE)   │ Position (8, BE)  │ │
//! │ └──────────────────┴───────────────────┘ │
//! ├──────────────────────────────────────────┤
//! │ Entry 1 ...                              │
//! ├──────────────────────────────────────────┤
//! │ Zero padding up to max_index_bytes       │
//! │ (present only while the index is open)   │
//! └──────────────────────────────────────────┘
//! ```

mod offset_index;
mod region;

pub use offset_index::Index;

// =============================================================================
// Entry Layout
// =============================================================================

/// Relative offset field: u32 (4 bytes)
pub const OFFSET_WIDTH: u64 = 4;

/// Store position field: u64 (8 bytes)
pub const POSITION_WIDTH: u64 = 8;

/// Full entry: Offset (4) + Position (8) = 12 bytes
pub const ENTRY_WIDTH: u64 = OFFSET_WIDTH + POSITION_WIDTH;
