//! # seglog
//!
//! Storage for a single log segment:
//! - An append-only record **store** of length-prefixed records
//! - A memory-mapped **offset index** with O(1) lookup by relative offset
//! - Buffered writes that reads always observe
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Owning Segment (external)                   │
//! │        rotation, global offsets, locking of the index       │
//! └──────────────┬──────────────────────────────┬───────────────┘
//!                │ append(record)               │ write(n, pos)
//!                │   → (len, pos)               │ read(n) → pos
//!                ▼                              ▼
//!   ┌──────────────────────────┐   ┌──────────────────────────┐
//!   │          Store           │   │          Index           │
//!   │  BufWriter + Mutex       │   │  MmapMut, 12-byte slots  │
//!   │  [len u64][bytes]...     │   │  [off u32][pos u64]...   │
//!   └──────────────────────────┘   └──────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use seglog::{Config, Index, Store};
//! # fn main() -> seglog::Result<()> {
//! let config = Config::builder().max_index_bytes(1024).build();
//! let store = Store::open("0.store".as_ref())?;
//! let mut index = Index::open("0.index".as_ref(), &config)?;
//!
//! let (_, position) = store.append(b"hello")?;
//! index.write(0, position)?;
//!
//! let (_, position) = index.read(0)?;
//! assert_eq!(store.read(position)?, b"hello");
//!
//! index.close()?;
//! store.close()?;
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

mod encoding;
pub mod store;
pub mod index;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{LogError, Result};
pub use config::Config;
pub use store::Store;
pub use index::Index;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of seglog
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
