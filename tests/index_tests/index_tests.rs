//! Tests for the offset Index
//!
//! These tests verify:
//! - Writing and reading entries, including `-1` for the last entry
//! - Capacity boundary: exactly floor(max / 12) writes fit
//! - End-of-file errors for empty and unwritten entries
//! - File reserved to max_index_bytes while open, shrunk to content at close
//! - Reopening a closed index

use std::path::{Path, PathBuf};

use seglog::index::ENTRY_WIDTH;
use seglog::{Config, Index, LogError};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_index() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("test.index");
    (temp_dir, path)
}

fn config_with_max(max_index_bytes: u64) -> Config {
    Config::builder().max_index_bytes(max_index_bytes).build()
}

fn file_len(path: &Path) -> u64 {
    std::fs::metadata(path).unwrap().len()
}

// =============================================================================
// Write / Read Tests
// =============================================================================

#[test]
fn test_two_entry_scenario() {
    let (_temp, path) = setup_temp_index();
    let mut index = Index::open(&path, &config_with_max(24)).unwrap();

    index.write(0, 0).unwrap();
    index.write(1, 11).unwrap();

    assert_eq!(index.read(0).unwrap(), (0, 0));
    assert_eq!(index.read(1).unwrap(), (1, 11));
    assert_eq!(index.read(-1).unwrap(), (1, 11));

    let err = index.write(2, 21).unwrap_err();
    assert!(err.is_eof());
    assert!(matches!(err, LogError::IndexFull { max_bytes: 24 }));
}

#[test]
fn test_entries_read_back_in_order() {
    let (_temp, path) = setup_temp_index();
    let mut index = Index::open(&path, &config_with_max(1024)).unwrap();

    let entries: Vec<(u32, u64)> = (0..50).map(|i| (i, u64::from(i) * 19 + 7)).collect();
    for &(offset, position) in &entries {
        index.write(offset, position).unwrap();
    }

    for (i, expected) in entries.iter().enumerate() {
        assert_eq!(index.read(i as i64).unwrap(), *expected);
    }
    assert_eq!(index.read(-1).unwrap(), entries[49]);
    assert_eq!(index.len(), 50);
    assert_eq!(index.size(), 50 * ENTRY_WIDTH);
}

#[test]
fn test_large_positions_round_trip() {
    let (_temp, path) = setup_temp_index();
    let mut index = Index::open(&path, &config_with_max(36)).unwrap();

    index.write(u32::MAX, u64::MAX).unwrap();
    assert_eq!(index.read(0).unwrap(), (u32::MAX, u64::MAX));
}

// =============================================================================
// Boundary Tests
// =============================================================================

#[test]
fn test_read_empty_index_is_eof() {
    let (_temp, path) = setup_temp_index();
    let index = Index::open(&path, &config_with_max(1024)).unwrap();

    assert!(index.is_empty());

    let err = index.read(-1).unwrap_err();
    assert!(err.is_eof());
    assert!(matches!(err, LogError::EntryNotFound { entry: -1, entries: 0 }));

    assert!(index.read(0).unwrap_err().is_eof());
}

#[test]
fn test_read_unwritten_entry_is_eof() {
    let (_temp, path) = setup_temp_index();
    let mut index = Index::open(&path, &config_with_max(1024)).unwrap();

    index.write(0, 0).unwrap();

    assert!(matches!(
        index.read(1),
        Err(LogError::EntryNotFound { entry: 1, entries: 1 })
    ));
    assert!(index.read(-2).unwrap_err().is_eof());
    assert!(index.read(i64::MAX).unwrap_err().is_eof());
}

#[test]
fn test_capacity_boundary() {
    // 100 bytes: 8 entries fit (96 bytes), the 4-byte tail is unusable
    let (_temp, path) = setup_temp_index();
    let mut index = Index::open(&path, &config_with_max(100)).unwrap();

    for i in 0..8u32 {
        assert!(!index.is_full());
        index.write(i, u64::from(i)).unwrap();
    }

    assert!(index.is_full());
    assert!(matches!(index.write(8, 8), Err(LogError::IndexFull { .. })));

    // A failed write leaves the index untouched
    assert_eq!(index.len(), 8);
    assert_eq!(index.read(-1).unwrap(), (7, 7));
}

#[test]
fn test_open_rejects_tiny_max() {
    let (_temp, path) = setup_temp_index();

    let result = Index::open(&path, &config_with_max(11));
    assert!(matches!(result, Err(LogError::Config(_))));
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[test]
fn test_file_reserved_while_open() {
    let (_temp, path) = setup_temp_index();
    let mut index = Index::open(&path, &config_with_max(1200)).unwrap();

    assert_eq!(file_len(&path), 1200);
    assert_eq!(index.capacity(), 1200);

    index.write(0, 0).unwrap();
    assert_eq!(file_len(&path), 1200);
    assert_eq!(index.size(), ENTRY_WIDTH);
}

#[test]
fn test_close_shrinks_to_content() {
    let (_temp, path) = setup_temp_index();
    let mut index = Index::open(&path, &config_with_max(1200)).unwrap();

    for i in 0..7u32 {
        index.write(i, u64::from(i) * 100).unwrap();
    }
    index.close().unwrap();

    assert_eq!(file_len(&path), 7 * ENTRY_WIDTH);
}

#[test]
fn test_close_empty_index_leaves_empty_file() {
    let (_temp, path) = setup_temp_index();
    let index = Index::open(&path, &config_with_max(1200)).unwrap();

    index.close().unwrap();
    assert_eq!(file_len(&path), 0);
}

#[test]
fn test_on_disk_format_after_close() {
    let (_temp, path) = setup_temp_index();
    let mut index = Index::open(&path, &config_with_max(120)).unwrap();

    index.write(1, 0x0A0B).unwrap();
    index.close().unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes, [0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0x0A, 0x0B]);
}

#[test]
fn test_drop_without_close_still_shrinks() {
    let (_temp, path) = setup_temp_index();
    {
        let mut index = Index::open(&path, &config_with_max(1200)).unwrap();
        index.write(0, 0).unwrap();
        index.write(1, 5).unwrap();
    }

    assert_eq!(file_len(&path), 2 * ENTRY_WIDTH);
}

#[test]
fn test_reopen_restores_entries() {
    let (_temp, path) = setup_temp_index();
    let config = config_with_max(1200);

    {
        let mut index = Index::open(&path, &config).unwrap();
        index.write(0, 0).unwrap();
        index.write(1, 11).unwrap();
        index.close().unwrap();
    }

    let mut index = Index::open(&path, &config).unwrap();
    assert_eq!(index.len(), 2);
    assert_eq!(index.read(-1).unwrap(), (1, 11));
    assert_eq!(file_len(&path), 1200);

    index.write(2, 21).unwrap();
    assert_eq!(index.read(2).unwrap(), (2, 21));
    assert_eq!(index.name(), path.as_path());
}

#[test]
fn test_reopen_with_smaller_max_is_rejected() {
    let (_temp, path) = setup_temp_index();

    {
        let mut index = Index::open(&path, &config_with_max(120)).unwrap();
        for i in 0..3u32 {
            index.write(i, 0).unwrap();
        }
        index.close().unwrap();
    }

    let result = Index::open(&path, &config_with_max(24));
    assert!(matches!(result, Err(LogError::Config(_))));
    assert_eq!(file_len(&path), 3 * ENTRY_WIDTH);
}

#[test]
fn test_open_partial_entry_is_corruption() {
    let (_temp, path) = setup_temp_index();
    std::fs::write(&path, [0u8; 13]).unwrap();

    let result = Index::open(&path, &config_with_max(120));
    assert!(matches!(result, Err(LogError::IndexCorruption(_))));
}
