use std::sync::Arc;

/// A fully built attack string.
///
/// The text is shared behind an `Arc<str>` so a bounded match can hand it to
/// a worker thread without copying a string that may be megabytes long.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttackString {
    text: Arc<str>,
    char_len: usize,
}

impl AttackString {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn shared(&self) -> Arc<str> {
        Arc::clone(&self.text)
    }

    /// Length in Unicode scalar values. This is the value reported as
    /// `inputLength`.
    pub fn char_len(&self) -> usize {
        self.char_len
    }

    pub fn byte_len(&self) -> usize {
        self.text.len()
    }

    /// MD5 hex digest of the text, used to correlate runs of the same case
    /// across engines in diagnostics.
    pub fn fingerprint(&self) -> String {
        format!("{:x}", md5::compute(self.text.as_bytes()))
    }
}

impl From<String> for AttackString {
    fn from(text: String) -> Self {
        let char_len = text.chars().count();
        Self {
            text: Arc::from(text),
            char_len,
        }
    }
}

impl From<&str> for AttackString {
    fn from(text: &str) -> Self {
        Self::from(text.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lengths_count_chars_not_bytes() {
        let attack = AttackString::from("añ€!");
        assert_eq!(attack.char_len(), 4);
        assert_eq!(attack.byte_len(), 1 + 2 + 3 + 1);
        assert_eq!(AttackString::from("").byte_len(), 0);
    }

    #[test]
    fn shared_text_is_the_same_allocation() {
        let attack = AttackString::from("aaaa!");
        let shared = attack.shared();
        assert_eq!(&*shared, attack.as_str());
        assert!(std::ptr::eq(shared.as_ptr(), attack.as_str().as_ptr()));
    }

    #[test]
    fn fingerprint_is_md5_hex() {
        let attack = AttackString::from("aaaaab");
        assert_eq!(attack.fingerprint(), format!("{:x}", md5::compute(b"aaaaab")));
        assert_eq!(attack.fingerprint().len(), 32);
    }
}
