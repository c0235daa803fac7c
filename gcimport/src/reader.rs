//! Low-level byte stream reader.
//!
//! The export data is framed with a simple escaping scheme so that it can be
//! embedded in archive files: `|S` stands for `$` and `||` for `|`. Integers
//! are zig-zag encoded base-128 varints built from unescaped bytes. When the
//! debug format is active every read is preceded by a marker byte and the
//! number of raw bytes consumed so far.

use crate::error::{FormatError, FormatResult};

/// Maximum encoded length of a 64-bit varint.
const MAX_VARINT_LEN: usize = 10;

/// Cursor over export data.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    read: usize,
    debug: bool,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            read: 0,
            debug: false,
        }
    }

    /// Raw bytes consumed so far, escape sequences counting as two.
    #[inline]
    pub fn read(&self) -> usize {
        self.read
    }

    /// Raw bytes left in the buffer.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len()
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Next logical byte, undoing the escaping.
    pub fn raw_byte(&mut self) -> FormatResult<u8> {
        let eof = FormatError::UnexpectedEof { offset: self.read };
        let (byte, width) = match *self.data {
            [b'|', b'S', ..] => (b'$', 2),
            [b'|', b'|', ..] => (b'|', 2),
            [b'|', _, ..] => return Err(FormatError::BadEscape { offset: self.read }),
            [b'|'] => return Err(eof),
            [byte, ..] => (byte, 1),
            [] => return Err(eof),
        };

        self.data = &self.data[width..];
        self.read += width;
        Ok(byte)
    }

    fn raw_uvarint(&mut self) -> FormatResult<u64> {
        let start = self.read;
        let mut value: u64 = 0;
        let mut shift = 0;

        for i in 0..MAX_VARINT_LEN {
            let byte = self.raw_byte()?;
            if byte < 0x80 {
                if i == MAX_VARINT_LEN - 1 && byte > 1 {
                    break;
                }
                return Ok(value | (byte as u64) << shift);
            }
            value |= ((byte & 0x7F) as u64) << shift;
            shift += 7;
        }

        Err(FormatError::VarintOverflow { offset: start })
    }

    /// Zig-zag decoded signed varint. Should only be used by low-level decoders.
    pub fn raw_i64(&mut self) -> FormatResult<i64> {
        let ux = self.raw_uvarint()?;
        let x = (ux >> 1) as i64;
        Ok(if ux & 1 != 0 { !x } else { x })
    }

    /// Bytes up to (excluding) the next newline, starting with `first`.
    ///
    /// Only used for the header lines.
    pub fn raw_stringln(&mut self, first: u8) -> FormatResult<String> {
        let mut buf = Vec::new();
        let mut byte = first;
        while byte != b'\n' {
            buf.push(byte);
            byte = self.raw_byte()?;
        }
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// `n` logical bytes.
    pub fn raw_bytes(&mut self, n: u64) -> FormatResult<Vec<u8>> {
        // Escapes only ever widen the encoding.
        let len = usize::try_from(n)
            .ok()
            .filter(|len| *len <= self.data.len())
            .ok_or(FormatError::LengthOutOfRange {
                len: n,
                remaining: self.data.len(),
            })?;

        let mut buf = Vec::with_capacity(len);
        for _ in 0..len {
            buf.push(self.raw_byte()?);
        }
        Ok(buf)
    }

    fn marker(&mut self, want: u8) -> FormatResult<()> {
        let got = self.raw_byte()?;
        if got != want {
            return Err(FormatError::BadMarker {
                got: got as char,
                want: want as char,
                offset: self.read,
            });
        }

        let pos = self.read;
        let n = self.raw_i64()?;
        if usize::try_from(n).ok() != Some(pos) {
            return Err(FormatError::BadMarkerPosition { got: n, want: pos });
        }
        Ok(())
    }

    /// A back-reference index (`>= 0`) or a tag (`< 0`).
    pub fn tag_or_index(&mut self) -> FormatResult<i64> {
        if self.debug {
            self.marker(b't')?;
        }
        self.raw_i64()
    }

    pub fn int64(&mut self) -> FormatResult<i64> {
        if self.debug {
            self.marker(b'i')?;
        }
        self.raw_i64()
    }

    /// An integer that must fit the platform word.
    pub fn int(&mut self) -> FormatResult<i64> {
        let x = self.int64()?;
        if isize::try_from(x).is_err() {
            return Err(FormatError::IntegerTooLarge(x));
        }
        Ok(x)
    }

    /// Header of a string record: an index into the string table (`>= 0`) or
    /// the negated length of a new string.
    pub fn string_header(&mut self) -> FormatResult<i64> {
        if self.debug {
            self.marker(b's')?;
        }
        self.raw_i64()
    }
}
