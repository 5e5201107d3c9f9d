/// Per-hospital token counter.
///
/// Numbering comes from a monotonic counter, never from the current number of
/// tickets, so a token is not reissued even if tickets disappear from a store.
#[derive(Debug, Clone)]
pub struct TokenAllocator {
    prefix: String,
    next: u32,
}

impl TokenAllocator {
    pub fn new(prefix: impl Into<String>, base: u32) -> Self {
        Self {
            prefix: prefix.into(),
            next: base,
        }
    }

    pub fn next_token(&mut self) -> String {
        let token = self.format(self.next);
        self.next = self.next.saturating_add(1);
        token
    }

    /// Number the next call to `next_token` will use.
    pub fn peek(&self) -> u32 {
        self.next
    }

    /// Moves the counter past a token issued elsewhere (e.g. restored state).
    pub fn observe(&mut self, token: &str) {
        if let Some(number) = self.parse_number(token) {
            if number >= self.next {
                self.next = number.saturating_add(1);
            }
        }
    }

    pub fn parse_number(&self, token: &str) -> Option<u32> {
        token
            .strip_prefix(self.prefix.as_str())?
            .strip_prefix('-')?
            .parse()
            .ok()
    }

    fn format(&self, number: u32) -> String {
        format!("{}-{}", self.prefix, number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issues_from_base_upwards() {
        let mut allocator = TokenAllocator::new("Q", 100);
        assert_eq!(allocator.next_token(), "Q-100");
        assert_eq!(allocator.next_token(), "Q-101");
        assert_eq!(allocator.peek(), 102);
    }

    #[test]
    fn observe_skips_past_restored_tokens() {
        let mut allocator = TokenAllocator::new("Q", 100);
        allocator.observe("Q-140");
        allocator.observe("Q-120");
        allocator.observe("A-500");
        assert_eq!(allocator.next_token(), "Q-141");
    }

    #[test]
    fn parse_rejects_foreign_prefixes() {
        let allocator = TokenAllocator::new("Q", 100);
        assert_eq!(allocator.parse_number("Q-105"), Some(105));
        assert_eq!(allocator.parse_number("QQ-105"), None);
        assert_eq!(allocator.parse_number("Q105"), None);
        assert_eq!(allocator.parse_number("Q-abc"), None);
    }
}
