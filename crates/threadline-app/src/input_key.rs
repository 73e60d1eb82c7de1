//! Abstract input key event, independent of any terminal library.
//!
//! Runners translate whatever input they receive into `InputKey` so the
//! engine never depends on a terminal crate.

/// Abstract input key event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKey {
    /// Regular character key
    Char(char),
    /// Character with Ctrl modifier (Ctrl+s, Ctrl+c, etc.)
    CharCtrl(char),
    /// Enter/Return key
    Enter,
    /// Escape key
    Esc,
    /// Backspace key
    Backspace,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_key_equality() {
        assert_eq!(InputKey::Char('a'), InputKey::Char('a'));
        assert_ne!(InputKey::Char('a'), InputKey::Char('b'));
        assert_ne!(InputKey::CharCtrl('s'), InputKey::Char('s'));
    }
}
