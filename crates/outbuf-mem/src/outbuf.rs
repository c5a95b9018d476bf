//! The growable binary output buffer.
//!
//! Content is `[0, size)`. Bytes in `[size, capacity)` are spare capacity
//! whose value is unspecified. `0 <= size <= capacity` holds after every
//! public call.

use std::fmt;
use std::io;
use std::ops::{Deref, DerefMut};

use outbuf_core::prelude::{AllocBudget, AllocLease, BufferConfig, GrowthPolicy};

use crate::budget::SharedLease;
use crate::error::{Error, Result};
use crate::growth;
use crate::leb128;
use crate::reserved::Reserved;

/// Backing memory. The vector's length *is* the capacity.
enum Storage<'a> {
    Owned(Vec<u8>),
    Borrowed(&'a mut [u8]),
}

impl Storage<'_> {
    #[inline]
    fn bytes(&self) -> &[u8] {
        match self {
            Storage::Owned(v) => v.as_slice(),
            Storage::Borrowed(m) => &m[..],
        }
    }

    #[inline]
    fn bytes_mut(&mut self) -> &mut [u8] {
        match self {
            Storage::Owned(v) => v.as_mut_slice(),
            Storage::Borrowed(m) => &mut m[..],
        }
    }
}

/// Growable byte buffer with a write cursor.
///
/// Owned buffers allocate their own memory. A buffer created with
/// [`Outbuffer::borrowed`] writes into caller memory until it runs out of
/// room; the first growth copies the content into an owned allocation and the
/// caller's memory is never touched again.
///
/// Not synchronized. Share across threads only behind your own lock.
///
/// ```
/// use outbuf_mem::Outbuffer;
///
/// let mut buf = Outbuffer::new();
/// let len_at = buf.write_zeros(4);
/// buf.write_bytes(b"payload");
/// let end = buf.size();
/// buf.position(len_at, 4);
/// buf.write32(7);
/// buf.set_size(end);
/// assert_eq!(&buf[..4], &7u32.to_le_bytes());
/// ```
pub struct Outbuffer<'a> {
    storage: Storage<'a>,
    cursor: usize,
    policy: GrowthPolicy,
    lease: Option<SharedLease>,
}

impl<'a> Outbuffer<'a> {
    /// Empty buffer with zero capacity; grows lazily.
    pub fn new() -> Self {
        Self {
            storage: Storage::Owned(Vec::new()),
            cursor: 0,
            policy: GrowthPolicy::default(),
            lease: None,
        }
    }

    /// Empty buffer with `capacity` bytes allocated up front.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: Storage::Owned(vec![0; capacity]),
            ..Self::new()
        }
    }

    /// Empty buffer sized and grown according to `config`.
    pub fn with_config(config: &BufferConfig) -> Result<Self> {
        config.validate()?;
        let mut buf = Self::with_capacity(config.initial_capacity);
        buf.policy = config.growth;
        Ok(buf)
    }

    /// Buffer writing into caller-supplied memory. Capacity is `memory.len()`.
    pub fn borrowed(memory: &'a mut [u8]) -> Self {
        Self {
            storage: Storage::Borrowed(memory),
            ..Self::new()
        }
    }

    /// Owned buffer whose capacity is accounted against `budget`.
    ///
    /// Every later growth must be granted by the budget first.
    pub fn with_budget(
        budget: &impl AllocBudget<Lease = SharedLease>,
        capacity: usize,
        tag: &'static str,
    ) -> Result<Self> {
        let lease = budget
            .try_lease(capacity, tag)
            .ok_or_else(|| Error::BudgetExceeded {
                tag,
                requested: capacity,
                capacity: budget.capacity_bytes(),
                used: budget.used_bytes(),
            })?;

        let mut vec = Vec::new();
        vec.try_reserve_exact(capacity)
            .map_err(|_| Error::AllocFailed { bytes: capacity })?;
        vec.resize(capacity, 0);

        Ok(Self {
            storage: Storage::Owned(vec),
            lease: Some(lease),
            ..Self::new()
        })
    }

    /// Replace the growth policy used from now on.
    pub fn set_growth_policy(&mut self, policy: GrowthPolicy) -> Result<()> {
        policy.validate()?;
        self.policy = policy;
        Ok(())
    }

    // ----- capacity -----

    /// Bytes written so far.
    #[inline]
    pub fn size(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cursor == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.bytes().len()
    }

    /// Free bytes after the cursor.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity() - self.cursor
    }

    /// False while the buffer still writes into borrowed memory.
    pub fn is_owned(&self) -> bool {
        matches!(self.storage, Storage::Owned(_))
    }

    /// Bytes currently leased from an allocation budget, if any.
    pub fn leased_bytes(&self) -> Option<usize> {
        self.lease.as_ref().map(|l| l.bytes())
    }

    /// Rewind to empty. Capacity is kept.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Ensure at least `nbytes` free bytes after the cursor.
    ///
    /// # Panics
    ///
    /// Panics if the allocation (or the budget) cannot provide the bytes.
    #[track_caller]
    pub fn reserve(&mut self, nbytes: usize) {
        if self.remaining() < nbytes {
            if let Err(err) = self.enlarge(nbytes) {
                growth_failed(err);
            }
        }
    }

    /// Like [`reserve`](Self::reserve) but reports failure instead of panicking.
    /// The buffer is unchanged on error.
    pub fn try_reserve(&mut self, nbytes: usize) -> Result<()> {
        if self.remaining() < nbytes {
            self.enlarge(nbytes)?;
        }
        Ok(())
    }

    /// Reserve `nbytes` and hand out a token for unchecked writes within them.
    #[track_caller]
    pub fn reserved(&mut self, nbytes: usize) -> Reserved<'_, 'a> {
        self.reserve(nbytes);
        Reserved::new(self, nbytes)
    }

    fn enlarge(&mut self, nbytes: usize) -> Result<()> {
        let old_cap = self.capacity();
        let mut new_cap = growth::next_capacity(&self.policy, old_cap, self.cursor, nbytes)?;
        if new_cap <= old_cap {
            return Ok(());
        }

        if let Some(lease) = self.lease.as_mut() {
            // over-allocation is optional; fall back to the exact need
            let exact = self.cursor + nbytes;
            if !lease.try_resize(new_cap) && !(exact < new_cap && lease.try_resize(exact)) {
                return Err(Error::BudgetExceeded {
                    tag: lease.tag(),
                    requested: exact.saturating_sub(lease.bytes()),
                    capacity: lease.budget_capacity(),
                    used: lease.budget_used(),
                });
            }
            new_cap = lease.bytes();
        }

        let used = self.cursor;
        let copied = match &mut self.storage {
            Storage::Owned(vec) => match vec.try_reserve_exact(new_cap - old_cap) {
                Ok(()) => {
                    vec.resize(new_cap, 0);
                    Ok(None)
                }
                Err(_) => Err(Error::AllocFailed { bytes: new_cap }),
            },
            Storage::Borrowed(mem) => {
                let mut vec = Vec::new();
                match vec.try_reserve_exact(new_cap) {
                    Ok(()) => {
                        vec.extend_from_slice(&mem[..used]);
                        vec.resize(new_cap, 0);
                        Ok(Some(vec))
                    }
                    Err(_) => Err(Error::AllocFailed { bytes: new_cap }),
                }
            }
        };

        match copied {
            Ok(Some(vec)) => self.storage = Storage::Owned(vec),
            Ok(None) => {}
            Err(err) => {
                if let Some(lease) = self.lease.as_mut() {
                    lease.try_resize(old_cap);
                }
                return Err(err);
            }
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(
            old_capacity = old_cap,
            new_capacity = new_cap,
            size = used,
            "outbuf grow"
        );

        Ok(())
    }

    // ----- unchecked writes -----
    //
    // These never grow. Writing past capacity panics, so callers must
    // `reserve` first.

    /// Write one byte without a capacity check.
    #[inline]
    #[track_caller]
    pub fn write_byte_n(&mut self, v: u8) {
        self.storage.bytes_mut()[self.cursor] = v;
        self.cursor += 1;
    }

    /// Write a slice without a capacity check.
    #[inline]
    #[track_caller]
    pub fn write_bytes_n(&mut self, bytes: &[u8]) {
        let end = self.cursor + bytes.len();
        self.storage.bytes_mut()[self.cursor..end].copy_from_slice(bytes);
        self.cursor = end;
    }

    /// Write `len` zero bytes without a capacity check.
    #[inline]
    #[track_caller]
    pub fn clear_n(&mut self, len: usize) {
        let end = self.cursor + len;
        self.storage.bytes_mut()[self.cursor..end].fill(0);
        self.cursor = end;
    }

    /// 16-bit little-endian, unchecked.
    #[inline]
    #[track_caller]
    pub fn write_word_n(&mut self, v: u16) {
        self.write_bytes_n(&v.to_le_bytes());
    }

    /// 16-bit big-endian, unchecked.
    #[inline]
    #[track_caller]
    pub fn write_short_n(&mut self, v: u16) {
        self.write_bytes_n(&v.to_be_bytes());
    }

    #[inline]
    #[track_caller]
    pub fn write32_n(&mut self, v: u32) {
        self.write_bytes_n(&v.to_le_bytes());
    }

    #[inline]
    #[track_caller]
    pub fn write64_n(&mut self, v: u64) {
        self.write_bytes_n(&v.to_le_bytes());
    }

    #[inline]
    #[track_caller]
    pub fn write_float_n(&mut self, v: f32) {
        self.write_bytes_n(&v.to_bits().to_le_bytes());
    }

    #[inline]
    #[track_caller]
    pub fn write_double_n(&mut self, v: f64) {
        self.write_bytes_n(&v.to_bits().to_le_bytes());
    }

    // ----- checked writes -----

    pub fn write_byte(&mut self, v: u8) {
        if self.cursor == self.capacity() {
            self.reserve(1);
        }
        self.write_byte_n(v);
    }

    /// 16-bit little-endian.
    pub fn write_word(&mut self, v: u16) {
        self.reserve(2);
        self.write_word_n(v);
    }

    /// 16-bit big-endian: high byte first, whatever the host order.
    pub fn write_short(&mut self, v: u16) {
        self.reserve(2);
        self.write_short_n(v);
    }

    /// 16-bit character, big-endian. Same as [`write_short`](Self::write_short).
    pub fn write_char(&mut self, v: u16) {
        self.write_short(v);
    }

    /// 32-bit little-endian.
    pub fn write32(&mut self, v: u32) {
        self.reserve(4);
        self.write32_n(v);
    }

    /// 64-bit little-endian.
    pub fn write64(&mut self, v: u64) {
        self.reserve(8);
        self.write64_n(v);
    }

    /// IEEE-754 single, raw bits little-endian.
    pub fn write_float(&mut self, v: f32) {
        self.reserve(4);
        self.write_float_n(v);
    }

    /// IEEE-754 double, raw bits little-endian.
    pub fn write_double(&mut self, v: f64) {
        self.reserve(8);
        self.write_double_n(v);
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.reserve(bytes.len());
        self.write_bytes_n(bytes);
    }

    /// Append the content of another buffer.
    pub fn write_buffer(&mut self, other: &Outbuffer<'_>) {
        self.write_bytes(other.as_slice());
    }

    /// Write `n` zero bytes and return the offset where they start, for
    /// patching later through [`position`](Self::position).
    pub fn write_zeros(&mut self, n: usize) -> usize {
        self.reserve(n);
        let start = self.cursor;
        self.clear_n(n);
        start
    }

    /// String bytes, no terminator.
    pub fn write_str(&mut self, s: &str) {
        self.write_bytes(s.as_bytes());
    }

    /// C string: bytes up to the first NUL (or all of them), then one NUL.
    pub fn write_cstring(&mut self, s: impl AsRef<[u8]>) {
        let bytes = s.as_ref();
        let len = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        self.reserve(len + 1);
        self.write_bytes_n(&bytes[..len]);
        self.write_byte_n(0);
    }

    /// Length-prefixed string: unsigned LEB128 byte count, then the bytes.
    pub fn write_counted(&mut self, bytes: &[u8]) {
        let len = bytes.len() as u64;
        self.reserve(leb128::uleb128_len(len) + bytes.len());
        leb128::put_uleb128(self, len);
        self.write_bytes_n(bytes);
    }

    // ----- positional access -----

    /// Move the cursor to `offset`, making sure `nbytes` fit there.
    ///
    /// Content up to the old cursor is preserved; the next write lands at
    /// `offset`. Restore the logical size with [`set_size`](Self::set_size)
    /// after patching if the offset was inside existing content.
    #[track_caller]
    pub fn position(&mut self, offset: usize, nbytes: usize) {
        let end = match offset.checked_add(nbytes) {
            Some(end) => end,
            None => growth_failed(Error::CapacityOverflow {
                size: offset,
                additional: nbytes,
            }),
        };
        if end > self.capacity() {
            // sized relative to the cursor so existing content stays put
            let additional = end - self.cursor;
            self.reserve(additional);
        }
        self.cursor = offset;
    }

    /// Set the logical size without growing or clearing.
    ///
    /// # Panics
    ///
    /// Panics if `size` exceeds the capacity.
    #[track_caller]
    pub fn set_size(&mut self, size: usize) {
        assert!(
            size <= self.capacity(),
            "set_size({size}) beyond capacity {}",
            self.capacity()
        );
        self.cursor = size;
    }

    /// Insert `bytes` before all existing content.
    pub fn prepend(&mut self, bytes: &[u8]) {
        let len = bytes.len();
        self.reserve(len);
        let size = self.cursor;
        let mem = self.storage.bytes_mut();
        mem.copy_within(0..size, len);
        mem[..len].copy_from_slice(bytes);
        self.cursor += len;
    }

    pub fn prepend_str(&mut self, s: &str) {
        self.prepend(s.as_bytes());
    }

    /// Wrap the content: `X` becomes `c1 X c2`.
    pub fn bracket(&mut self, c1: u8, c2: u8) {
        self.reserve(2);
        self.prepend(&[c1]);
        self.write_byte_n(c2);
    }

    // ----- views -----

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.storage.bytes()[..self.cursor]
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        let size = self.cursor;
        &mut self.storage.bytes_mut()[..size]
    }

    /// Content followed by a NUL terminator. `size()` is unchanged; the
    /// terminator sits in spare capacity.
    pub fn to_byte_string(&mut self) -> &[u8] {
        self.reserve(1);
        let size = self.cursor;
        let mem = self.storage.bytes_mut();
        mem[size] = 0;
        &mem[..=size]
    }

    /// Take the content. Borrowed content is copied out.
    pub fn into_vec(self) -> Vec<u8> {
        let size = self.cursor;
        match self.storage {
            Storage::Owned(mut vec) => {
                vec.truncate(size);
                vec
            }
            Storage::Borrowed(mem) => mem[..size].to_vec(),
        }
    }
}

#[cold]
#[track_caller]
fn growth_failed(err: Error) -> ! {
    #[cfg(feature = "tracing")]
    tracing::error!(error = %err, "outbuf growth failed");
    panic!("outbuf: {err}");
}

impl Default for Outbuffer<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Outbuffer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Outbuffer")
            .field("size", &self.cursor)
            .field("capacity", &self.capacity())
            .field("owned", &self.is_owned())
            .field("leased", &self.leased_bytes())
            .finish()
    }
}

impl Deref for Outbuffer<'_> {
    type Target = [u8];
    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl DerefMut for Outbuffer<'_> {
    fn deref_mut(&mut self) -> &mut [u8] {
        self.as_mut_slice()
    }
}

impl AsRef<[u8]> for Outbuffer<'_> {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl io::Write for Outbuffer<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_bytes(buf);
        Ok(buf.len())
    }

    // Nothing is buffered beyond the content itself.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::SharedBudget;

    #[test]
    fn byte_then_word_little_endian() {
        let mut buf = Outbuffer::new();
        buf.write_byte(0x41);
        buf.write_word(0x0203);
        assert_eq!(buf.size(), 3);
        assert_eq!(buf.as_slice(), &[0x41, 0x03, 0x02]);
    }

    #[test]
    fn short_and_char_are_big_endian() {
        let mut buf = Outbuffer::new();
        buf.write_byte(0x41);
        buf.write_short(0x0203);
        buf.write_char(0xABCD);
        assert_eq!(buf.as_slice(), &[0x41, 0x02, 0x03, 0xAB, 0xCD]);
    }

    #[test]
    fn fixed_width_and_floats() {
        let mut buf = Outbuffer::new();
        buf.write32(0xAABBCCDD);
        buf.write64(0x0102030405060708);
        buf.write_float(1.5);
        buf.write_double(-2.25);
        let mut want = Vec::new();
        want.extend_from_slice(&[0xDD, 0xCC, 0xBB, 0xAA]);
        want.extend_from_slice(&[8, 7, 6, 5, 4, 3, 2, 1]);
        want.extend_from_slice(&1.5f32.to_bits().to_le_bytes());
        want.extend_from_slice(&(-2.25f64).to_bits().to_le_bytes());
        assert_eq!(buf.as_slice(), &want[..]);
        assert_eq!(buf.size(), 24);
    }

    #[test]
    fn new_buffer_is_empty_with_no_capacity() {
        let buf = Outbuffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), 0);
        assert!(buf.is_owned());
        assert_eq!(buf.leased_bytes(), None);
    }

    #[test]
    fn with_capacity_does_not_grow_until_full() {
        let mut buf = Outbuffer::with_capacity(8);
        buf.write64(1);
        assert_eq!(buf.capacity(), 8);
        assert_eq!(buf.remaining(), 0);
        buf.write_byte(2);
        assert!(buf.capacity() >= 9);
        assert_eq!(buf.size(), 9);
    }

    #[test]
    fn with_config_applies_policy() {
        let cfg = BufferConfig {
            initial_capacity: 4,
            growth: GrowthPolicy::EXACT,
        };
        let mut buf = Outbuffer::with_config(&cfg).unwrap();
        assert_eq!(buf.capacity(), 4);
        buf.write_bytes(b"hello");
        assert_eq!(buf.capacity(), 5);

        let bad = BufferConfig {
            initial_capacity: 0,
            growth: GrowthPolicy {
                factor_percent: 50,
                align: 16,
            },
        };
        assert!(matches!(
            Outbuffer::with_config(&bad),
            Err(Error::Core(outbuf_core::error::Error::Config(_)))
        ));
    }

    #[test]
    fn growth_policy_can_be_swapped() {
        let mut buf = Outbuffer::new();
        buf.set_growth_policy(GrowthPolicy::EXACT).unwrap();
        buf.write_bytes(&[0; 3]);
        assert_eq!(buf.capacity(), 3);

        let bad = GrowthPolicy {
            factor_percent: 150,
            align: 3,
        };
        assert!(buf.set_growth_policy(bad).is_err());
        buf.write_byte(1);
        assert_eq!(buf.capacity(), 4);
    }

    #[test]
    fn reset_keeps_capacity() {
        let mut buf = Outbuffer::new();
        buf.write_bytes(&[1; 40]);
        let cap = buf.capacity();
        buf.reset();
        assert_eq!(buf.size(), 0);
        assert_eq!(buf.capacity(), cap);
    }

    #[test]
    fn zeros_then_backpatch() {
        let mut buf = Outbuffer::new();
        buf.write_byte(0xEE);
        let at = buf.write_zeros(4);
        buf.write_bytes(&[9, 9]);
        assert_eq!(at, 1);
        assert_eq!(&buf[1..5], &[0, 0, 0, 0]);

        let end = buf.size();
        buf.position(at, 4);
        buf.write32(0xAABBCCDD);
        buf.set_size(end);
        assert_eq!(buf.as_slice(), &[0xEE, 0xDD, 0xCC, 0xBB, 0xAA, 9, 9]);
    }

    #[test]
    fn position_past_capacity_preserves_content() {
        let mut buf = Outbuffer::with_capacity(4);
        buf.write_bytes(&[1, 2, 3]);
        buf.position(10, 6);
        assert!(buf.capacity() >= 16);
        assert_eq!(buf.size(), 10);
        buf.write_word(0xBEEF);
        assert_eq!(&buf[..3], &[1, 2, 3]);
        assert_eq!(&buf[10..12], &[0xEF, 0xBE]);
    }

    #[test]
    #[should_panic(expected = "beyond capacity")]
    fn set_size_past_capacity_panics() {
        let mut buf = Outbuffer::with_capacity(4);
        buf.set_size(5);
    }

    #[test]
    #[should_panic]
    fn unchecked_write_without_reserve_panics() {
        let mut buf = Outbuffer::with_capacity(2);
        buf.write32_n(1);
    }

    #[test]
    fn unchecked_writes_after_one_reserve() {
        let mut buf = Outbuffer::new();
        buf.reserve(1 + 2 + 2 + 4 + 8 + 3 + 2);
        let cap = buf.capacity();
        buf.write_byte_n(1);
        buf.write_word_n(0x0302);
        buf.write_short_n(0x0405);
        buf.write32_n(0x09080706);
        buf.write64_n(0x11100F0E0D0C0B0A);
        buf.write_bytes_n(&[0x12, 0x13, 0x14]);
        buf.clear_n(2);
        assert_eq!(buf.capacity(), cap);
        let want: Vec<u8> = (1..=0x14).chain([0, 0]).collect();
        assert_eq!(buf.as_slice(), &want[..]);
    }

    #[test]
    fn prepend_and_bracket() {
        let mut buf = Outbuffer::new();
        buf.write_str("body");
        buf.prepend(b"head:");
        assert_eq!(buf.as_slice(), b"head:body");
        buf.prepend_str(">");
        buf.bracket(b'(', b')');
        assert_eq!(buf.as_slice(), b"(>head:body)");
    }

    #[test]
    fn prepend_into_empty_buffer() {
        let mut buf = Outbuffer::new();
        buf.prepend(b"abc");
        assert_eq!(buf.as_slice(), b"abc");
        buf.bracket(b'[', b']');
        assert_eq!(buf.as_slice(), b"[abc]");
    }

    #[test]
    fn strings() {
        let mut buf = Outbuffer::new();
        buf.write_str("ab");
        buf.write_cstring("cd");
        buf.write_cstring(b"ef\0gh");
        buf.write_counted(b"xyz");
        assert_eq!(buf.as_slice(), b"abcd\0ef\0\x03xyz");
    }

    #[test]
    fn byte_string_adds_terminator_without_growing_size() {
        let mut buf = Outbuffer::new();
        buf.write_str("text");
        assert_eq!(buf.to_byte_string(), b"text\0");
        assert_eq!(buf.size(), 4);

        let mut empty = Outbuffer::new();
        assert_eq!(empty.to_byte_string(), b"\0");
    }

    #[test]
    fn borrowed_memory_switches_to_owned_on_growth() {
        let mut mem = [0xFFu8; 4];
        {
            let mut buf = Outbuffer::borrowed(&mut mem);
            assert!(!buf.is_owned());
            assert_eq!(buf.capacity(), 4);
            buf.write_word(0x0201);
            assert!(!buf.is_owned());
            buf.write32(0x06050403);
            assert!(buf.is_owned());
            buf.write_byte(0xAA);
            assert_eq!(buf.as_slice(), &[1, 2, 3, 4, 5, 6, 0xAA]);
        }
        // only the bytes written before the switch reached the caller's memory
        assert_eq!(mem, [1, 2, 0xFF, 0xFF]);
    }

    #[test]
    fn borrowed_into_vec_copies() {
        let mut mem = [0u8; 8];
        let mut buf = Outbuffer::borrowed(&mut mem);
        buf.write_str("hi");
        assert_eq!(buf.into_vec(), b"hi".to_vec());
    }

    #[test]
    fn write_buffer_and_io_write() {
        use std::io::Write;

        let mut a = Outbuffer::new();
        a.write_str("left");
        let mut b = Outbuffer::new();
        write!(b, "{}-", 42).unwrap();
        b.write_buffer(&a);
        b.flush().unwrap();
        assert_eq!(b.into_vec(), b"42-left".to_vec());
    }

    #[test]
    fn deref_allows_patching_through_slices() {
        let mut buf = Outbuffer::new();
        buf.write_bytes(&[0; 4]);
        buf[1..3].copy_from_slice(&[7, 8]);
        assert_eq!(&*buf, &[0, 7, 8, 0]);
        assert_eq!(buf.as_ref().len(), 4);
    }

    #[test]
    fn budgeted_growth_is_accounted_and_returned() {
        let budget = SharedBudget::new(64);
        {
            let mut buf = Outbuffer::with_budget(&budget, 16, "section").unwrap();
            assert_eq!(budget.used_bytes(), 16);
            buf.write_bytes(&[1; 20]);
            assert_eq!(buf.leased_bytes(), Some(buf.capacity()));
            assert_eq!(budget.used_bytes(), buf.capacity());

            let err = buf.try_reserve(100).unwrap_err();
            assert!(matches!(err, Error::BudgetExceeded { tag: "section", .. }));
            assert_eq!(buf.size(), 20);
            assert_eq!(budget.used_bytes(), buf.capacity());
        }
        assert_eq!(budget.used_bytes(), 0);
    }

    #[test]
    fn budget_refuses_initial_capacity() {
        let budget = SharedBudget::new(8);
        let err = Outbuffer::with_budget(&budget, 9, "big").unwrap_err();
        assert!(matches!(
            err,
            Error::BudgetExceeded {
                requested: 9,
                capacity: 8,
                ..
            }
        ));
    }

    #[test]
    #[should_panic(expected = "allocation budget exceeded")]
    fn checked_write_over_budget_is_fatal() {
        let budget = SharedBudget::new(16);
        let mut buf = Outbuffer::with_budget(&budget, 16, "tight").unwrap();
        buf.write_bytes(&[0; 17]);
    }

    #[test]
    fn try_reserve_overflow_leaves_buffer_intact() {
        let mut buf = Outbuffer::new();
        buf.write_byte(1);
        assert!(matches!(
            buf.try_reserve(usize::MAX),
            Err(Error::CapacityOverflow { .. })
        ));
        assert_eq!(buf.as_slice(), &[1]);
    }
}
