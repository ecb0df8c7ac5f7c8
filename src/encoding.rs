//! Big-endian integer encoding shared by the store and the index.
//!
//! Callers hand in slices of exactly the field width; the `bytes` accessors
//! panic on a short slice, so widths are fixed by the constants in each module.

use bytes::{Buf, BufMut};

pub(crate) fn put_u32(mut dst: &mut [u8], value: u32) {
    dst.put_u32(value);
}

pub(crate) fn put_u64(mut dst: &mut [u8], value: u64) {
    dst.put_u64(value);
}

pub(crate) fn get_u32(mut src: &[u8]) -> u32 {
    src.get_u32()
}

pub(crate) fn get_u64(mut src: &[u8]) -> u64 {
    src.get_u64()
}
