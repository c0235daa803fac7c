//! Synthetic source positions.
//!
//! Export data only carries `(file, line)` pairs, delta encoded against the
//! previous position. Every file name gets a virtual file of [`MAX_LINES`]
//! bytes whose line `n` starts at offset `n - 1`, so a line maps to a position
//! in column 1.
use std::collections::HashMap;

use gotypes::position::{FileId, FileSet, Pos};
use once_cell::sync::Lazy;

use crate::{
    driver::Importer,
    error::{FormatError, FormatResult},
};

/// Lines reserved per synthesized file.
pub const MAX_LINES: usize = 64 * 1024;

/// Line table shared by every synthesized file: one line per byte.
static FAKE_LINES: Lazy<Vec<usize>> = Lazy::new(|| (0..MAX_LINES).collect());

/// Last position seen and the files synthesized so far.
#[derive(Debug, Default)]
pub(crate) struct PosSynthesizer {
    prev_file: Vec<u8>,
    prev_line: i64,
    files: HashMap<Vec<u8>, FileId>,
}

impl PosSynthesizer {
    fn file(&mut self, fset: &mut FileSet, name: &[u8]) -> FileId {
        if let Some(&id) = self.files.get(name) {
            return id;
        }

        let id = fset.add_file(String::from_utf8_lossy(name), MAX_LINES);
        let installed = fset.file_mut(id).set_lines(FAKE_LINES.as_slice());
        debug_assert!(installed, "fake line table fits the file");
        self.files.insert(name.to_vec(), id);
        id
    }

    /// Position of the current `(file, line)`; out-of-range lines map to line 1.
    fn synthesize(&mut self, fset: &mut FileSet) -> Pos {
        let line = match usize::try_from(self.prev_line) {
            Ok(line @ 1..=MAX_LINES) => line,
            _ => 1,
        };
        let name = self.prev_file.clone();
        let id = self.file(fset, &name);
        fset.file(id).pos(line - 1)
    }
}

impl Importer<'_> {
    /// Read a position record.
    pub(crate) fn pos(&mut self) -> FormatResult<Pos> {
        if !self.flags.pos_info {
            return Ok(Pos::NONE);
        }

        let delta = self.reader.int()?;
        if delta != 0 {
            self.positions.prev_line = self.positions.prev_line.wrapping_add(delta);
        } else {
            let n = self.reader.int()?;
            if n >= 0 {
                let previous = &self.positions.prev_file;
                let prefix = usize::try_from(n)
                    .ok()
                    .filter(|len| *len <= previous.len())
                    .ok_or_else(|| FormatError::BadFilePrefix {
                        len: n,
                        previous: String::from_utf8_lossy(previous).into_owned(),
                    })?;

                let suffix = self.string_bytes()?;
                let mut file = self.positions.prev_file[..prefix].to_vec();
                file.extend_from_slice(&suffix);
                self.positions.prev_file = file;
                self.positions.prev_line = self.reader.int()?;
            }
        }

        Ok(self.positions.synthesize(self.fset))
    }
}
