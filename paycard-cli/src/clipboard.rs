//! Terminal clipboard via the OSC 52 escape sequence.
//!
//! The terminal emulator, not this process, owns the system clipboard. When
//! stdout is not a terminal there is nobody to interpret the sequence, so the
//! clipboard reports itself unavailable.

use paycard_core::copy_feedback::{Clipboard, CopyError};
use std::io::{IsTerminal, Stdout, Write};

pub struct Osc52Clipboard<W> {
    out: W,
    enabled: bool,
}

impl Osc52Clipboard<Stdout> {
    pub fn stdout() -> Self {
        let out = std::io::stdout();
        let enabled = out.is_terminal();
        Self { out, enabled }
    }
}

impl<W: Write> Osc52Clipboard<W> {
    pub fn new(out: W, enabled: bool) -> Self {
        Self { out, enabled }
    }
}

impl<W: Write> Clipboard for Osc52Clipboard<W> {
    fn write_text(&mut self, text: &str) -> Result<(), CopyError> {
        if !self.enabled {
            return Err(CopyError::Unavailable("stdout is not a terminal".to_string()));
        }
        self.out
            .write_all(osc52_sequence(text).as_bytes())
            .and_then(|_| self.out.flush())
            .map_err(|e| CopyError::Unavailable(e.to_string()))
    }
}

/// `ESC ] 52 ; c ; <base64> BEL`
pub fn osc52_sequence(text: &str) -> String {
    let encoded = fast32::base64::RFC4648.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x07")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_is_padded_base64() {
        assert_eq!(osc52_sequence("0xABC"), "\x1b]52;c;MHhBQkM=\x07");
        assert_eq!(osc52_sequence("hi"), "\x1b]52;c;aGk=\x07");
    }

    #[test]
    fn test_writes_sequence_when_enabled() {
        let mut clipboard = Osc52Clipboard::new(Vec::new(), true);
        clipboard.write_text("19.16").unwrap();
        assert_eq!(clipboard.out, b"\x1b]52;c;MTkuMTY=\x07".to_vec());
    }

    #[test]
    fn test_unavailable_when_not_a_terminal() {
        let mut clipboard = Osc52Clipboard::new(Vec::new(), false);
        assert!(matches!(
            clipboard.write_text("19.16"),
            Err(CopyError::Unavailable(_))
        ));
        assert!(clipboard.out.is_empty());
    }
}
