//! Base64 VLQ codec used by the `mappings` field.
//!
//! Each value is a run of base64 digits. Bit 5 of a digit is the continuation
//! flag, bits 0-4 carry payload, least significant group first. Bit 0 of the
//! assembled payload is the sign.

use crate::{Error, Result};

const BASE64_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
const BASE64_VALUES: [i8; 256] = get_base64_map();

const CONTINUATION_BIT: u64 = 0b100000;
const PAYLOAD_MASK: u64 = 0b11111;

// sign bit plus a 32-bit magnitude
const MAX_BITS: u32 = 33;

const fn get_base64_map() -> [i8; 256] {
    let mut res = [-1i8; 256];
    // `for in` is not allowed in const fn
    let mut idx = 0;
    while idx < 64 {
        res[BASE64_CHARS[idx] as usize] = idx as i8;
        idx += 1;
    }
    res
}

/// Decodes one VLQ value from `input` starting at `offset`.
///
/// Returns the value and the offset of the first byte after it.
///
/// # Errors
///
/// [Error::MalformedVlq] if the input ends while a continuation bit is set,
/// a byte outside the base64 alphabet is found, or the value does not fit in
/// an `i32`. Trailing zero digits after the significant ones are accepted.
pub fn decode(input: &[u8], offset: usize) -> Result<(i32, usize)> {
    let mut acc = 0u64;
    let mut shift = 0u32;
    let mut pos = offset;

    loop {
        let Some(&byte) = input.get(pos) else {
            return Err(malformed(input));
        };
        let digit = BASE64_VALUES[byte as usize];
        if digit < 0 {
            return Err(malformed(input));
        }
        let digit = digit as u64;
        pos += 1;

        // redundant zero digits are allowed, set bits past MAX_BITS are not
        let payload = digit & PAYLOAD_MASK;
        if payload != 0 {
            if shift >= MAX_BITS {
                return Err(malformed(input));
            }
            acc |= payload << shift;
            if acc >> MAX_BITS != 0 {
                return Err(malformed(input));
            }
        }
        shift = shift.saturating_add(5);

        if digit & CONTINUATION_BIT == 0 {
            break;
        }
    }

    let magnitude = acc >> 1;
    let value = if acc & 1 == 1 {
        if magnitude > 1 << 31 {
            return Err(malformed(input));
        }
        -(magnitude as i64)
    } else {
        if magnitude > i32::MAX as u64 {
            return Err(malformed(input));
        }
        magnitude as i64
    };

    Ok((value as i32, pos))
}

/// Appends the VLQ encoding of `value` to `out`.
pub fn encode(value: i32, out: &mut String) {
    let value = value as i64;
    let mut num = if value < 0 {
        ((-value as u64) << 1) | 1
    } else {
        (value as u64) << 1
    };

    loop {
        let mut digit = num & PAYLOAD_MASK;
        num >>= 5;
        if num != 0 {
            digit |= CONTINUATION_BIT;
        }
        out.push(BASE64_CHARS[digit as usize] as char);
        if num == 0 {
            break;
        }
    }
}

#[cold]
fn malformed(input: &[u8]) -> Error {
    Error::MalformedVlq(String::from_utf8_lossy(input).into_owned())
}

/// Decodes every field of a single segment into a fixed buffer.
#[derive(Debug)]
pub(crate) struct SegmentDecoder {
    buf: [i32; 5],
}

impl SegmentDecoder {
    pub fn new() -> Self {
        Self { buf: [0; 5] }
    }

    pub fn decode(&mut self, segment: &str) -> Result<&[i32]> {
        let bytes = segment.as_bytes();
        let mut len = 0;
        let mut offset = 0;

        while offset < bytes.len() {
            let (value, next) = decode(bytes, offset)?;
            if let Some(slot) = self.buf.get_mut(len) {
                *slot = value;
            }
            len += 1;
            offset = next;
        }

        if !matches!(len, 1 | 4 | 5) {
            return Err(Error::InvalidSegmentArity {
                segment: segment.to_owned(),
                fields: len,
            });
        }

        Ok(&self.buf[..len])
    }
}
