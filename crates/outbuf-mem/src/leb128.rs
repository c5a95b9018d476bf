//! LEB128 variable-length integers.
//!
//! Seven data bits per byte, low-order group first; the high bit of every
//! byte except the last is set. Encoders emit the minimal form. Decoders
//! accept padded forms as long as the value fits in 64 bits.

use crate::error::{Error, Result};
use crate::outbuf::Outbuffer;

/// Longest encoding of a 64-bit value.
pub const MAX_LEB128_LEN: usize = 10;

/// Encoded length of `value` as unsigned LEB128.
pub fn uleb128_len(mut value: u64) -> usize {
    let mut len = 1;
    while value >= 0x80 {
        value >>= 7;
        len += 1;
    }
    len
}

/// Encoded length of `value` as signed LEB128.
pub fn sleb128_len(mut value: i64) -> usize {
    let mut len = 1;
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if sleb128_done(value, byte) {
            return len;
        }
        len += 1;
    }
}

// The rest of the value is pure sign extension of bit 6 of `byte`.
#[inline]
fn sleb128_done(rest: i64, byte: u8) -> bool {
    (rest == 0 && byte & 0x40 == 0) || (rest == -1 && byte & 0x40 != 0)
}

/// Unchecked unsigned encode; capacity must already be reserved.
pub(crate) fn put_uleb128(buf: &mut Outbuffer<'_>, mut value: u64) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            buf.write_byte_n(byte);
            return;
        }
        buf.write_byte_n(byte | 0x80);
    }
}

/// Unchecked signed encode; capacity must already be reserved.
pub(crate) fn put_sleb128(buf: &mut Outbuffer<'_>, mut value: i64) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if sleb128_done(value, byte) {
            buf.write_byte_n(byte);
            return;
        }
        buf.write_byte_n(byte | 0x80);
    }
}

impl Outbuffer<'_> {
    pub fn write_uleb128(&mut self, value: u64) {
        self.reserve(uleb128_len(value));
        put_uleb128(self, value);
    }

    pub fn write_sleb128(&mut self, value: i64) {
        self.reserve(sleb128_len(value));
        put_sleb128(self, value);
    }
}

/// Decode an unsigned LEB128 value from the front of `input`.
///
/// Returns the value and the number of bytes consumed.
pub fn decode_uleb128(input: &[u8]) -> Result<(u64, usize)> {
    let mut result = 0u64;
    let mut shift = 0u32;
    for (i, &byte) in input.iter().enumerate() {
        let group = u64::from(byte & 0x7F);
        if (shift == 63 && group > 1) || (shift > 63 && group != 0) {
            return Err(Error::Leb128Overflow { bits: 64 });
        }
        if shift < 64 {
            result |= group << shift;
        }
        if byte & 0x80 == 0 {
            return Ok((result, i + 1));
        }
        shift = shift.saturating_add(7);
    }
    Err(Error::Leb128Truncated { read: input.len() })
}

/// Decode a signed LEB128 value from the front of `input`.
///
/// Returns the value and the number of bytes consumed.
pub fn decode_sleb128(input: &[u8]) -> Result<(i64, usize)> {
    let mut result = 0i64;
    let mut shift = 0u32;
    for (i, &byte) in input.iter().enumerate() {
        let group = byte & 0x7F;
        if shift >= 63 {
            // only sign extension of bit 63 may remain
            let ok = if shift == 63 {
                group == 0 || group == 0x7F
            } else {
                group == if result < 0 { 0x7F } else { 0 }
            };
            if !ok {
                return Err(Error::Leb128Overflow { bits: 64 });
            }
        }
        if shift < 64 {
            result |= i64::from(group) << shift;
        }
        shift = shift.saturating_add(7);
        if byte & 0x80 == 0 {
            if shift < 64 && group & 0x40 != 0 {
                result |= -1i64 << shift;
            }
            return Ok((result, i + 1));
        }
    }
    Err(Error::Leb128Truncated { read: input.len() })
}
