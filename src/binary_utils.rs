use std::io::{Cursor, Read};

use crate::error::{PackError, Result};

pub fn remaining(cursor: &Cursor<&[u8]>) -> u64 {
    (cursor.get_ref().len() as u64).saturating_sub(cursor.position())
}

pub fn read_array<const N: usize>(cursor: &mut Cursor<&[u8]>) -> Result<[u8; N]> {
    if remaining(cursor) < N as u64 {
        return Err(PackError::TruncatedBundle(format!(
            "need {} bytes at offset {}, only {} remaining",
            N,
            cursor.position(),
            remaining(cursor)
        )));
    }

    let mut buf = [0u8; N];
    cursor.read_exact(&mut buf)?;
    Ok(buf)
}

pub fn read_u32_le(cursor: &mut Cursor<&[u8]>) -> Result<u32> {
    read_array::<4>(cursor).map(u32::from_le_bytes)
}

pub fn read_f32_le(cursor: &mut Cursor<&[u8]>) -> Result<f32> {
    read_array::<4>(cursor).map(f32::from_le_bytes)
}

pub fn write_u32_le(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

pub fn write_f32_le(out: &mut Vec<u8>, value: f32) {
    out.extend_from_slice(&value.to_le_bytes());
}
