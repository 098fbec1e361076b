//! Matcher for the `true` / `false` / `null` keyword literals.

use crate::token::Token;

/// What happened after feeding one more character into the matcher.
pub(crate) enum LiteralStep {
    /// Character matched, but the literal is not finished yet.
    NeedMore,
    /// Character matched and completed the literal.
    Done(Token),
    /// Character did not match the expected byte.
    Reject,
}

/// `None` means no literal is in flight; `Some` holds the remaining bytes
/// and the token the literal completes into.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct LiteralMatcher(Option<(&'static [u8], Token)>);

impl LiteralMatcher {
    pub(crate) fn none() -> Self {
        Self(None)
    }

    /// Starts matching after the first character (`t`, `f`, or `n`).
    pub(crate) fn new(first: char) -> Self {
        match first {
            't' => Self(Some((b"rue", Token::True))),
            'f' => Self(Some((b"alse", Token::False))),
            'n' => Self(Some((b"ull", Token::Null))),
            _ => Self::none(),
        }
    }

    pub(crate) fn step(&mut self, c: char) -> LiteralStep {
        let Some((bytes, token)) = self.0.take() else {
            return LiteralStep::Reject;
        };

        if bytes.first().is_some_and(|b| *b as char == c) {
            // Checked non-empty above.
            let rest = &bytes[1..];
            if rest.is_empty() {
                LiteralStep::Done(token)
            } else {
                self.0 = Some((rest, token));
                LiteralStep::NeedMore
            }
        } else {
            self.0 = Some((bytes, token));
            LiteralStep::Reject
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_each_literal() {
        for (first, rest, token) in [
            ('t', "rue", Token::True),
            ('f', "alse", Token::False),
            ('n', "ull", Token::Null),
        ] {
            let mut m = LiteralMatcher::new(first);
            let mut chars = rest.chars().peekable();
            while let Some(c) = chars.next() {
                match m.step(c) {
                    LiteralStep::NeedMore => assert!(chars.peek().is_some()),
                    LiteralStep::Done(t) => {
                        assert_eq!(t, token);
                        assert!(chars.peek().is_none());
                    }
                    LiteralStep::Reject => panic!("unexpected reject at {c:?}"),
                }
            }
        }
    }

    #[test]
    fn rejects_divergence() {
        let mut m = LiteralMatcher::new('t');
        assert!(matches!(m.step('r'), LiteralStep::NeedMore));
        assert!(matches!(m.step('x'), LiteralStep::Reject));
    }
}
