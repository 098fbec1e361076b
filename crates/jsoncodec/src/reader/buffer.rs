//! Ring of unread characters backing the lexer.

use alloc::collections::VecDeque;

/// Carry-over characters from fed chunks, consumed as the lexer advances.
#[derive(Debug, Default)]
pub(crate) struct CharRing {
    chars: VecDeque<char>,
}

impl CharRing {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.chars.extend(text.chars());
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.chars.front().copied()
    }

    pub(crate) fn advance(&mut self) -> Option<char> {
        self.chars.pop_front()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Drops all pending characters and returns the backing storage.
    pub(crate) fn clear(&mut self) {
        self.chars.clear();
        self.chars.shrink_to_fit();
    }
}

#[cfg(test)]
mod tests {
    use super::CharRing;

    #[test]
    fn peek_does_not_consume() {
        let mut ring = CharRing::new();
        ring.push_str("ab");
        assert_eq!(ring.peek(), Some('a'));
        assert_eq!(ring.peek(), Some('a'));
        assert_eq!(ring.advance(), Some('a'));
        assert_eq!(ring.advance(), Some('b'));
        assert_eq!(ring.advance(), None);
    }

    #[test]
    fn chunks_concatenate() {
        let mut ring = CharRing::new();
        ring.push_str("he");
        ring.push_str("llo");
        let mut s = alloc::string::String::new();
        while let Some(c) = ring.advance() {
            s.push(c);
        }
        assert_eq!(s, "hello");
    }
}
