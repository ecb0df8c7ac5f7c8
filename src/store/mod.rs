//! Store Module
//!
//! Append-only file of length-prefixed records.
//!
//! ## Responsibilities
//! - Append records through a buffered writer
//! - Hand back the byte position of each record for the index
//! - Make buffered writes visible to reads (flush before every read)
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────┐
//! │ Record 1                        │
//! │ ┌─────────────┬───────────────┐ │
//! │ │ Len (8, BE) │ Data (Len)    │ │
//! │ └─────────────┴───────────────┘ │
//! ├─────────────────────────────────┤
//! │ Record 2                        │
//! │ ┌─────────────┬───────────────┐ │
//! │ │ Len (8, BE) │ Data (Len)    │ │
//! │ └─────────────┴───────────────┘ │
//! └─────────────────────────────────┘
//! ```
//!
//! The file length is exact by construction, so the store never truncates itself.

mod record_store;

pub use record_store::Store;

/// Width of the big-endian length prefix in front of every record
pub const LEN_WIDTH: u64 = 8;
