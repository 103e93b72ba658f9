//! Text-split memoization.
//!
//! Wrapping the same cell text at the same width and font happens hundreds of
//! times across a bulk run (every student shares the subject catalog), so the
//! wrapped-line result is cached. The cache is an explicit injected instance,
//! not a process global, so tests and concurrent bulk runs stay isolated.

use std::collections::HashMap;
use std::collections::VecDeque;

use crate::fonts::Font;

pub const DEFAULT_SPLIT_CACHE_CAPACITY: usize = 500;

/// Exact-match key: literal text, wrap width, font size, font (family+style).
/// Float fields compare by bit pattern; a width that differs in the last ulp
/// is a different entry, which is fine for a memo cache.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct SplitKey {
    text: String,
    width_bits: u32,
    size_bits: u32,
    font: Font,
}

/// Bounded memo of text-wrapping results.
///
/// Eviction is FIFO on insertion order: when full, the single oldest inserted
/// key is dropped before the new one goes in. Deliberately not LRU — a key
/// that is hit constantly still ages out once capacity+1 distinct keys have
/// been inserted after it. No time-based expiry. Lookups never fail; a miss
/// just recomputes.
pub struct TextSplitCache {
    entries: HashMap<SplitKey, Vec<String>>,
    order: VecDeque<SplitKey>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl TextSplitCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
            hits: 0,
            misses: 0,
        }
    }

    pub fn get_or_compute(
        &mut self,
        text: &str,
        width_mm: f32,
        font_size: f32,
        font: Font,
        compute: impl FnOnce() -> Vec<String>,
    ) -> Vec<String> {
        let key = SplitKey {
            text: text.to_owned(),
            width_bits: width_mm.to_bits(),
            size_bits: font_size.to_bits(),
            font,
        };
        if let Some(lines) = self.entries.get(&key) {
            self.hits += 1;
            return lines.clone();
        }
        self.misses += 1;
        let lines = compute();
        if self.entries.len() >= self.capacity
            && let Some(oldest) = self.order.pop_front()
        {
            self.entries.remove(&oldest);
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, lines.clone());
        lines
    }

    /// Whether an exact-match entry is currently cached.
    pub fn contains(&self, text: &str, width_mm: f32, font_size: f32, font: Font) -> bool {
        self.entries.contains_key(&SplitKey {
            text: text.to_owned(),
            width_bits: width_mm.to_bits(),
            size_bits: font_size.to_bits(),
            font,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// (hits, misses) since construction, for the bulk timing log.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

impl Default for TextSplitCache {
    fn default() -> Self {
        Self::new(DEFAULT_SPLIT_CACHE_CAPACITY)
    }
}
