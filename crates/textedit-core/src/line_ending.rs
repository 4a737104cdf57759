//! Line ending helpers.
//!
//! Documents keep their text verbatim, so a buffer may mix terminators. The line table treats
//! `\n`, `\r\n` and a lone `\r` as one line break each. [`LineEnding`] records the dominant
//! convention so inserted text can be rewritten to match it.

/// The newline sequence a document prefers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// Unix-style LF (`'\n'`).
    #[default]
    Lf,
    /// Windows-style CRLF (`"\r\n"`).
    Crlf,
    /// Classic Mac CR (`'\r'`).
    Cr,
}

impl LineEnding {
    /// Detect the dominant line ending from a source text.
    ///
    /// Policy: any CRLF (`"\r\n"`) wins, then any lone CR, otherwise [`LineEnding::Lf`].
    pub fn detect_in_text(text: &str) -> Self {
        if text.contains("\r\n") {
            Self::Crlf
        } else if text.contains('\r') {
            Self::Cr
        } else {
            Self::Lf
        }
    }

    /// The terminator sequence.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Crlf => "\r\n",
            Self::Cr => "\r",
        }
    }

    /// Rewrite every line break in `text` (`\n`, `\r\n` or `\r`) to this line ending.
    pub fn apply_to_text(self, text: &str) -> String {
        if !text.contains(['\r', '\n']) {
            return text.to_string();
        }

        let mut out = String::with_capacity(text.len());
        let mut chars = text.chars().peekable();
        while let Some(ch) = chars.next() {
            match ch {
                '\r' => {
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    out.push_str(self.as_str());
                }
                '\n' => out.push_str(self.as_str()),
                _ => out.push(ch),
            }
        }
        out
    }
}
