use std::fmt::{self, Display, Write};

use crate::Byte;

const ASCII_SPACE: Byte = 32;
const ASCII_DEL: Byte = 127;

/// A hex and ASCII rendering of a span of memory, one row per paragraph
///
/// Each row looks like `$1000 41 FF | A. |`: the absolute address of the
/// first byte, the bytes in hex, then the bytes as characters.
#[derive(Debug)]
pub struct Dump<'a> {
    pub(crate) bytes: &'a [Byte],
    /// Absolute address of `bytes[0]`
    pub(crate) origin: usize,
    pub(crate) columns: usize,
}

impl Dump<'_> {
    /// Number of rows the dump renders
    pub fn rows(&self) -> usize {
        self.bytes.len().div_ceil(self.columns)
    }
}

/// Map a byte to the character shown in the ASCII column
///
/// Control bytes, DEL and every byte from 0x80 up render as `.`.
fn printable(byte: Byte) -> char {
    if byte < ASCII_SPACE || byte >= ASCII_DEL {
        '.'
    } else {
        byte as char
    }
}

impl Display for Dump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut address = self.origin;
        for row in self.bytes.chunks(self.columns) {
            write!(f, "${:04X} ", address)?;
            for byte in row {
                write!(f, "{:02X} ", byte)?;
            }
            f.write_str("| ")?;
            for &byte in row {
                f.write_char(printable(byte))?;
            }
            f.write_str(" |\n")?;
            address += row.len();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fmt::Write;

    use super::{printable, Dump};

    #[test]
    fn test_printable() {
        assert_eq!(printable(b'A'), 'A');
        assert_eq!(printable(b' '), ' ');
        assert_eq!(printable(b'~'), '~');
        assert_eq!(printable(0x00), '.');
        assert_eq!(printable(0x1F), '.');
        assert_eq!(printable(0x7F), '.');
        assert_eq!(printable(0x80), '.');
        assert_eq!(printable(0xFF), '.');
    }

    #[test]
    fn test_partial_row() {
        let bytes = [0x30, 0x31, 0x32, 0x33, 0x34];
        let dump = Dump {
            bytes: &bytes,
            origin: 0x0200,
            columns: 4,
        };
        assert_eq!(dump.rows(), 2);
        assert_eq!(
            dump.to_string(),
            "$0200 30 31 32 33 | 0123 |\n$0204 34 | 4 |\n"
        );
    }

    #[test]
    fn test_write_into_string() {
        let bytes = *b"hi\n";
        let dump = Dump {
            bytes: &bytes,
            origin: 0xFFFD,
            columns: 3,
        };
        let mut out = String::from("> ");
        write!(out, "{}", dump).unwrap();
        assert_eq!(out, "> $FFFD 68 69 0A | hi. |\n");
    }

    #[test]
    fn test_empty() {
        let dump = Dump {
            bytes: &[],
            origin: 0x0000,
            columns: 16,
        };
        assert_eq!(dump.rows(), 0);
        assert_eq!(dump.to_string(), "");
    }
}
