//! Quoted-argument tokenizer
//!
//! Splits a command line on ASCII whitespace. A token opening with `'` or
//! `"` runs to the matching quote, spaces included, and the quotes are not
//! part of the token. The line itself is never modified; tokens borrow it.

/// Maximum tokens kept per line; extras are dropped.
pub const MAX_TOKENS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Between,
    Bare,
    Quoted(u8),
}

/// Tokens of one line, in order
#[derive(Debug, Clone, Copy)]
pub struct Tokens<'a, const M: usize = MAX_TOKENS> {
    items: [&'a str; M],
    count: usize,
}

impl<'a, const M: usize> Tokens<'a, M> {
    pub fn split(line: &'a str) -> Self {
        let mut tokens = Self {
            items: [""; M],
            count: 0,
        };
        let bytes = line.as_bytes();
        let mut state = State::Between;
        let mut start = 0;

        for (i, &b) in bytes.iter().enumerate() {
            match state {
                State::Between => {
                    if b.is_ascii_whitespace() {
                        continue;
                    }
                    if b == b'\'' || b == b'"' {
                        state = State::Quoted(b);
                        start = i + 1;
                    } else {
                        state = State::Bare;
                        start = i;
                    }
                }
                State::Bare if b.is_ascii_whitespace() => {
                    tokens.push(&line[start..i]);
                    state = State::Between;
                }
                State::Quoted(q) if b == q => {
                    tokens.push(&line[start..i]);
                    state = State::Between;
                }
                _ => {}
            }
        }
        // Unterminated quotes run to end of line
        if state != State::Between {
            tokens.push(&line[start..]);
        }
        tokens
    }

    fn push(&mut self, token: &'a str) {
        if token.is_empty() {
            return;
        }
        if self.count == M {
            log::debug!("token limit {} reached, dropping {:?}", M, token);
            return;
        }
        self.items[self.count] = token;
        self.count += 1;
    }

    pub fn as_slice(&self) -> &[&'a str] {
        &self.items[..self.count]
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.as_slice().get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.as_slice().iter().copied()
    }
}

/// Split `line` into at most [`MAX_TOKENS`] tokens
pub fn split(line: &str) -> Tokens<'_> {
    Tokens::split(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_words() {
        let t = split("md 0x40000000");
        assert_eq!(t.as_slice(), &["md", "0x40000000"]);
    }

    #[test]
    fn test_extra_whitespace() {
        let t = split("   pt  \t 10   20  ");
        assert_eq!(t.as_slice(), &["pt", "10", "20"]);
    }

    #[test]
    fn test_empty_line() {
        assert!(split("").is_empty());
        assert!(split("    ").is_empty());
    }

    #[test]
    fn test_double_quotes() {
        let t = split(r#"mw 40000000 41 "x y" 42"#);
        assert_eq!(t.as_slice(), &["mw", "40000000", "41", "x y", "42"]);
    }

    #[test]
    fn test_single_quotes() {
        let t = split("mw 1 'hi there'");
        assert_eq!(t.as_slice(), &["mw", "1", "hi there"]);
    }

    #[test]
    fn test_other_quote_inside() {
        let t = split(r#"a "it's" 'say "x"'"#);
        assert_eq!(t.as_slice(), &["a", "it's", r#"say "x""#]);
    }

    #[test]
    fn test_quote_mid_token_is_literal() {
        let t = split(r#"ab"cd ef"#);
        assert_eq!(t.as_slice(), &[r#"ab"cd"#, "ef"]);
    }

    #[test]
    fn test_quote_closes_without_space() {
        let t = split(r#""ab"cd"#);
        assert_eq!(t.as_slice(), &["ab", "cd"]);
    }

    #[test]
    fn test_unterminated_quote() {
        let t = split(r#"mw 1 "open ended"#);
        assert_eq!(t.as_slice(), &["mw", "1", "open ended"]);
    }

    #[test]
    fn test_empty_quotes_skipped() {
        let t = split(r#"a "" '' b"#);
        assert_eq!(t.as_slice(), &["a", "b"]);
    }

    #[test]
    fn test_token_limit() {
        let mut line = [0u8; 80];
        for (i, b) in line.iter_mut().enumerate() {
            *b = if i % 2 == 0 { b'x' } else { b' ' };
        }
        let line = core::str::from_utf8(&line).unwrap();
        let t = split(line);
        assert_eq!(t.len(), MAX_TOKENS);
        assert!(t.iter().all(|s| s == "x"));
    }

    #[test]
    fn test_get() {
        let t = split("color red");
        assert_eq!(t.get(0), Some("color"));
        assert_eq!(t.get(1), Some("red"));
        assert_eq!(t.get(2), None);
    }

    #[test]
    fn test_split_is_idempotent_on_plain_tokens() {
        let first = split("line 1 2 3 4");
        let mut joined = String::new();
        for (i, s) in first.iter().enumerate() {
            if i > 0 {
                joined.push(' ');
            }
            joined.push_str(s);
        }
        let second = split(&joined);
        assert_eq!(first.as_slice(), second.as_slice());
    }
}
