// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Vertex label allocation
//!
//! Labels are single characters handed out in code point order starting at
//! `'A'`. Past `char::MAX` the sequence continues as `#1`, `#2` and so on.
//! A [`LabelCursor`] is a cheap handle: clones share the same cursor, so
//! several graphs can draw from one sequence when the host wants the
//! application-wide lettering, or each graph can own a private cursor.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// First label handed out by a fresh or reset cursor
pub const FIRST_LABEL: char = 'A';

/// Prefix of the numbered labels that follow the last code point
pub const OVERFLOW_PREFIX: char = '#';

const LAST_SCALAR: u32 = char::MAX as u32;

/// Step over the surrogate block, which holds no scalar values
fn scalar(code: u32) -> u32 {
    if (0xD800..=0xDFFF).contains(&code) {
        0xE000
    } else {
        code
    }
}

fn label(code: u32) -> String {
    match char::from_u32(code) {
        Some(c) => c.to_string(),
        None => format!("{OVERFLOW_PREFIX}{}", code - LAST_SCALAR),
    }
}

fn code_of(label: &str) -> Option<u32> {
    let mut chars = label.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c as u32),
        (Some(OVERFLOW_PREFIX), Some(_)) => {
            let n: u32 = label[OVERFLOW_PREFIX.len_utf8()..].parse().ok()?;
            (n > 0).then(|| LAST_SCALAR.saturating_add(n))
        }
        _ => None,
    }
}

/// Shared, resettable label sequence
#[derive(Debug, Clone)]
pub struct LabelCursor {
    next: Arc<AtomicU32>,
}

impl Default for LabelCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl LabelCursor {
    /// Create a cursor positioned at [`FIRST_LABEL`]
    #[must_use]
    pub fn new() -> Self {
        Self {
            next: Arc::new(AtomicU32::new(FIRST_LABEL as u32)),
        }
    }

    /// Take the next label and advance by one code point
    pub fn allocate(&self) -> String {
        let taken = self
            .next
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |code| {
                Some(scalar(code).saturating_add(1))
            })
            .unwrap_or_else(|code| code);
        label(scalar(taken))
    }

    /// Label the next call to [`allocate`](Self::allocate) would return
    ///
    /// `None` once the single-character labels are used up.
    #[must_use]
    pub fn peek(&self) -> Option<char> {
        char::from_u32(scalar(self.next.load(Ordering::Relaxed)))
    }

    /// Rewind to [`FIRST_LABEL`]
    pub fn reset(&self) {
        self.next.store(FIRST_LABEL as u32, Ordering::Relaxed);
    }

    /// Make sure `label` is never handed out again
    ///
    /// Only labels this cursor could produce take part in the sequence;
    /// anything else is ignored.
    pub fn advance_past(&self, label: &str) {
        if let Some(code) = code_of(label) {
            self.next.fetch_max(code.saturating_add(1), Ordering::Relaxed);
        }
    }

    /// Whether two handles share the same sequence
    #[must_use]
    pub fn shares_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.next, &other.next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocates_in_code_point_order() {
        let cursor = LabelCursor::new();
        let labels: Vec<String> = (0..4).map(|_| cursor.allocate()).collect();
        insta::assert_snapshot!(labels.join(" "), @"A B C D");
    }

    #[test]
    fn test_clones_share_the_sequence() {
        let a = LabelCursor::new();
        let b = a.clone();
        assert_eq!(a.allocate(), "A");
        assert_eq!(b.allocate(), "B");
        assert!(a.shares_with(&b));
        assert!(!a.shares_with(&LabelCursor::new()));
    }

    #[test]
    fn test_reset_rewinds() {
        let cursor = LabelCursor::new();
        cursor.allocate();
        cursor.allocate();
        cursor.reset();
        assert_eq!(cursor.peek(), Some('A'));
        assert_eq!(cursor.allocate(), "A");
    }

    #[test]
    fn test_advance_past() {
        let cursor = LabelCursor::new();
        cursor.advance_past("C");
        assert_eq!(cursor.allocate(), "D");
        // Never moves backwards, ignores multi-character labels
        cursor.advance_past("A");
        cursor.advance_past("ZZ");
        assert_eq!(cursor.allocate(), "E");
    }

    #[test]
    fn test_continues_past_last_code_point() {
        let cursor = LabelCursor::new();
        cursor.advance_past("\u{10FFFF}");
        assert_eq!(cursor.peek(), None);
        assert_eq!(cursor.allocate(), "#1");
        assert_eq!(cursor.allocate(), "#2");

        cursor.advance_past("#7");
        assert_eq!(cursor.allocate(), "#8");
        // Not produced by the sequence
        cursor.advance_past("#0");
        cursor.advance_past("#x");
        assert_eq!(cursor.allocate(), "#9");

        cursor.reset();
        assert_eq!(cursor.allocate(), "A");
    }

    #[test]
    fn test_skips_surrogates() {
        let cursor = LabelCursor::new();
        cursor.advance_past("\u{D7FF}");
        assert_eq!(cursor.allocate(), "\u{E000}");
    }
}
