//! Unchecked writes confined to a reserved span.
//!
//! `Outbuffer::reserved(n)` grows once and returns a `Reserved` that writes
//! without further capacity checks. Each write is checked against the span
//! instead, so a miscounted batch panics at the overrun instead of silently
//! writing into spare capacity.

use crate::leb128;
use crate::outbuf::Outbuffer;

pub struct Reserved<'b, 'a> {
    buf: &'b mut Outbuffer<'a>,
    end: usize,
}

impl<'b, 'a> Reserved<'b, 'a> {
    pub(crate) fn new(buf: &'b mut Outbuffer<'a>, nbytes: usize) -> Self {
        let end = buf.size() + nbytes;
        debug_assert!(end <= buf.capacity());
        Self { buf, end }
    }

    /// Bytes of the span not yet written.
    pub fn remaining(&self) -> usize {
        self.end - self.buf.size()
    }

    /// Offset the next write lands at.
    pub fn offset(&self) -> usize {
        self.buf.size()
    }

    #[inline]
    #[track_caller]
    fn claim(&self, nbytes: usize) {
        assert!(
            nbytes <= self.remaining(),
            "reserved span overrun: {nbytes} bytes written with {} left",
            self.remaining()
        );
    }

    #[track_caller]
    pub fn write_byte(&mut self, v: u8) {
        self.claim(1);
        self.buf.write_byte_n(v);
    }

    /// 16-bit little-endian.
    #[track_caller]
    pub fn write_word(&mut self, v: u16) {
        self.claim(2);
        self.buf.write_word_n(v);
    }

    /// 16-bit big-endian.
    #[track_caller]
    pub fn write_short(&mut self, v: u16) {
        self.claim(2);
        self.buf.write_short_n(v);
    }

    #[track_caller]
    pub fn write32(&mut self, v: u32) {
        self.claim(4);
        self.buf.write32_n(v);
    }

    #[track_caller]
    pub fn write64(&mut self, v: u64) {
        self.claim(8);
        self.buf.write64_n(v);
    }

    #[track_caller]
    pub fn write_float(&mut self, v: f32) {
        self.claim(4);
        self.buf.write_float_n(v);
    }

    #[track_caller]
    pub fn write_double(&mut self, v: f64) {
        self.claim(8);
        self.buf.write_double_n(v);
    }

    #[track_caller]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.claim(bytes.len());
        self.buf.write_bytes_n(bytes);
    }

    #[track_caller]
    pub fn clear(&mut self, len: usize) {
        self.claim(len);
        self.buf.clear_n(len);
    }

    #[track_caller]
    pub fn write_uleb128(&mut self, v: u64) {
        self.claim(leb128::uleb128_len(v));
        leb128::put_uleb128(self.buf, v);
    }

    #[track_caller]
    pub fn write_sleb128(&mut self, v: i64) {
        self.claim(leb128::sleb128_len(v));
        leb128::put_sleb128(self.buf, v);
    }
}
