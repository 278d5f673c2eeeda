//! Byte-level helpers shared by the record and descriptor codecs.
//!
//! Fixed-width integers are big-endian. Variable-length byte strings carry a
//! Bitcoin CompactSize length prefix, whose multi-byte forms are
//! little-endian per the wire format. Readers take a `&mut &[u8]` cursor and
//! advance it past what they consume.

use thiserror::Error;

/// Longest var-bytes field a decoder will accept.
pub const MAX_VAR_BYTES_LEN: usize = 10_000;

/// Errors surfaced while decoding stored records.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Ran out of bytes in the middle of a field.
    #[error("unexpected end of input, needed {needed} bytes but had {remaining}")]
    UnexpectedEof { needed: usize, remaining: usize },

    /// A field decoded to something structurally invalid.
    #[error("malformed field {0}")]
    MalformedField(&'static str),

    /// A stored tag did not match any known variant.
    #[error("invalid variant tag for {0}")]
    InvalidVariant(&'static str),
}

pub type CodecResult<T> = Result<T, CodecError>;

/// Reads exactly `N` bytes from the front of `data`, advancing it.
pub fn read_exact<const N: usize>(data: &mut &[u8]) -> CodecResult<[u8; N]> {
    if data.len() < N {
        return Err(CodecError::UnexpectedEof {
            needed: N,
            remaining: data.len(),
        });
    }
    let (head, rest) = data.split_at(N);
    *data = rest;
    let mut buf = [0u8; N];
    buf.copy_from_slice(head);
    Ok(buf)
}

/// Reads `len` bytes from the front of `data` into an owned buffer.
pub fn read_bytes(data: &mut &[u8], len: usize) -> CodecResult<Vec<u8>> {
    if data.len() < len {
        return Err(CodecError::UnexpectedEof {
            needed: len,
            remaining: data.len(),
        });
    }
    let (head, rest) = data.split_at(len);
    *data = rest;
    Ok(head.to_vec())
}

pub fn read_u16(data: &mut &[u8]) -> CodecResult<u16> {
    Ok(u16::from_be_bytes(read_exact::<2>(data)?))
}

pub fn read_u32(data: &mut &[u8]) -> CodecResult<u32> {
    Ok(u32::from_be_bytes(read_exact::<4>(data)?))
}

pub fn read_u64(data: &mut &[u8]) -> CodecResult<u64> {
    Ok(u64::from_be_bytes(read_exact::<8>(data)?))
}

pub fn write_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

pub fn write_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}

pub fn write_u64(out: &mut Vec<u8>, value: u64) {
    out.extend_from_slice(&value.to_be_bytes());
}

/// Writes a CompactSize length prefix followed by the bytes themselves.
pub fn write_var_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    write_compact_size(out, bytes.len() as u64);
    out.extend_from_slice(bytes);
}

/// Reads a CompactSize-prefixed byte string, rejecting lengths over
/// [`MAX_VAR_BYTES_LEN`].
pub fn read_var_bytes(data: &mut &[u8]) -> CodecResult<Vec<u8>> {
    let len = read_compact_size(data)?;
    if len > MAX_VAR_BYTES_LEN as u64 {
        return Err(CodecError::MalformedField("var bytes length over cap"));
    }
    read_bytes(data, len as usize)
}

/// Writes a Bitcoin CompactSize integer.
pub fn write_compact_size(out: &mut Vec<u8>, value: u64) {
    match value {
        0..=0xfc => out.push(value as u8),
        0xfd..=0xffff => {
            out.push(0xfd);
            out.extend_from_slice(&(value as u16).to_le_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            out.push(0xfe);
            out.extend_from_slice(&(value as u32).to_le_bytes());
        }
        _ => {
            out.push(0xff);
            out.extend_from_slice(&value.to_le_bytes());
        }
    }
}

/// Reads a Bitcoin CompactSize integer.
pub fn read_compact_size(data: &mut &[u8]) -> CodecResult<u64> {
    let [tag] = read_exact::<1>(data)?;
    match tag {
        0xfd => Ok(u16::from_le_bytes(read_exact::<2>(data)?) as u64),
        0xfe => Ok(u32::from_le_bytes(read_exact::<4>(data)?) as u64),
        0xff => Ok(u64::from_le_bytes(read_exact::<8>(data)?)),
        n => Ok(n as u64),
    }
}
