//! Shared byte-string primitives: common-prefix length, the big-endian packed key used
//! by the sample-sort classifier, and the run/cursor views the mergesort and parallel
//! merge build on top of.

/// Length of the common prefix shared by `a` and `b`, in bytes.
#[inline]
pub(crate) fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    let max = a.len().min(b.len());
    let mut i = 0;
    while i < max && a[i] == b[i] {
        i += 1;
    }
    i
}

/// Loads 8 bytes from `bytes` starting at `offset` into a big-endian `u64`, zero-padded.
///
/// Big-endian packing means lexicographic order on the byte slice agrees with unsigned
/// integer order on the packed key: a short string's implicit zero-padding sorts before
/// any string with a non-zero byte at the same position, matching NUL-termination order.
#[inline(always)]
pub(crate) fn pack_key(bytes: &[u8], offset: usize) -> u64 {
    let mut buf = [0u8; 8];
    if offset >= bytes.len() {
        return 0;
    }
    let available = bytes.len() - offset;
    if available >= 8 {
        buf.copy_from_slice(&bytes[offset..offset + 8]);
    } else {
        buf[..available].copy_from_slice(&bytes[offset..]);
    }
    u64::from_be_bytes(buf)
}

/// `true` if the packed key block straddles or reaches the end of `bytes` (i.e. one of
/// the 8 packed bytes is synthetic zero padding rather than real data). Equivalent to the
/// source's "packed byte block contains a NUL" signal used to stop equality-bucket
/// recursion once a string has fully terminated within the key.
#[inline(always)]
pub(crate) fn key_block_terminates(bytes: &[u8], offset: usize) -> bool {
    bytes.len() <= offset + 8
}

/// A single sorted, LCP-annotated run: `lcp[k]` (for `k >= 1`) is the common-prefix
/// length between `strings[k-1]` and `strings[k]`. `lcp[0]` is unused.
///
/// This is the Rust realization of the source's `LcpStringPtr` pair of arrays, scoped
/// to read-only access to an already-sorted run (used as merge input).
#[derive(Clone, Copy)]
pub(crate) struct LcpRun<'a> {
    pub strings: &'a [&'a [u8]],
    pub lcp: &'a [usize],
}

impl<'a> LcpRun<'a> {
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

/// A cache-augmented sorted run, extending [`LcpRun`] with a per-string distinguishing
/// byte: `cache[k] == strings[k][lcp[k]]` if `lcp[k] < strings[k].len()`, else `0`.
///
/// Used by the parallel merge driver, which repeatedly slices a run into disjoint
/// sub-ranges at sampled splitters (see [`CacheRun::sub`]).
#[derive(Clone, Copy)]
pub(crate) struct CacheRun<'a> {
    pub strings: &'a [&'a [u8]],
    pub lcp: &'a [usize],
    pub cache: &'a [u8],
}

impl<'a> CacheRun<'a> {
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Sub-range `[start, start+len)`, keeping all three parallel arrays in lock-step.
    pub fn sub(&self, start: usize, len: usize) -> CacheRun<'a> {
        CacheRun {
            strings: &self.strings[start..start + len],
            lcp: &self.lcp[start..start + len],
            cache: &self.cache[start..start + len],
        }
    }

    pub fn as_lcp_run(&self) -> LcpRun<'a> {
        LcpRun {
            strings: self.strings,
            lcp: self.lcp,
        }
    }
}

/// Builds the distinguishing-character cache for an already LCP-annotated run.
pub(crate) fn build_cache(strings: &[&[u8]], lcp: &[usize]) -> Vec<u8> {
    strings
        .iter()
        .zip(lcp.iter())
        .map(|(s, &l)| if l < s.len() { s[l] } else { 0 })
        .collect()
}
