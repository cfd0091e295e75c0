use bytes::{BufMut, BytesMut};

/// Byte that ends a line. It is never part of the emitted text.
pub const LINE_TERMINATOR: u8 = b'\n';

/// Emitted in place of a line whose bytes are not valid UTF-8.
pub const NON_UTF8_LINE: &str = "Error: Non string data. Perhaps you wanted data or bytes output?";

const INITIAL_LINE_CAPACITY: usize = 256;

/// Accumulates bytes into `\n`-terminated lines.
///
/// Bytes after the last terminator stay pending until the next one arrives;
/// if the source ends first they are discarded by whoever owns the decoder.
#[derive(Debug)]
pub struct LineDecoder {
    buf: BytesMut,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self {
            buf: BytesMut::with_capacity(INITIAL_LINE_CAPACITY),
        }
    }

    /// Feed one byte. Returns the completed line when `byte` is the terminator.
    pub fn push(&mut self, byte: u8) -> Option<String> {
        if byte != LINE_TERMINATOR {
            self.buf.put_u8(byte);
            return None;
        }

        let line = self.buf.split();
        Some(match String::from_utf8(line.to_vec()) {
            Ok(text) => text,
            Err(_) => NON_UTF8_LINE.to_string(),
        })
    }

    /// Bytes accumulated since the last terminator.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(input: &[u8]) -> (Vec<String>, LineDecoder) {
        let mut decoder = LineDecoder::new();
        let lines = input.iter().filter_map(|&b| decoder.push(b)).collect();
        (lines, decoder)
    }

    #[test]
    fn splits_on_line_feed() {
        let (lines, decoder) = decode(b"ab\ncd\n");
        assert_eq!(lines, vec!["ab", "cd"]);
        assert_eq!(decoder.pending(), 0);
    }

    #[test]
    fn empty_lines_are_emitted() {
        let (lines, _) = decode(b"\n\nx\n");
        assert_eq!(lines, vec!["", "", "x"]);
    }

    #[test]
    fn carriage_return_is_kept() {
        let (lines, _) = decode(b"ok\r\n");
        assert_eq!(lines, vec!["ok\r"]);
    }

    #[test]
    fn trailing_partial_line_stays_pending() {
        let (lines, decoder) = decode(b"one\ntw");
        assert_eq!(lines, vec!["one"]);
        assert_eq!(decoder.pending(), 2);
    }

    #[test]
    fn invalid_utf8_yields_placeholder_and_resets() {
        let (lines, decoder) = decode(b"\xff\xfe\nnext\n");
        assert_eq!(lines, vec![NON_UTF8_LINE, "next"]);
        assert_eq!(decoder.pending(), 0);
    }

    #[test]
    fn multibyte_characters_survive_byte_feeding() {
        let (lines, _) = decode("grüß dich\n€\n".as_bytes());
        assert_eq!(lines, vec!["grüß dich", "€"]);
    }
}
