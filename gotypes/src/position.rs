//! Synthetic source positions
//!
//! Export data only records `(file, line)` pairs, so positions are synthesized:
//! a [`FileSet`] hands out one contiguous range of [`Pos`] values per registered
//! [`File`], and each file carries a table of line start offsets. A position is
//! an offset into that range and can be resolved back into a human readable
//! [`Position`] with [`FileSet::position`].

/// A compact source position. `Pos::NONE` (zero) means "no position".
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pos(usize);

impl Pos {
    pub const NONE: Pos = Pos(0);

    /// Returns `true` if this position refers to a registered file.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.0 != 0
    }

    #[inline]
    pub const fn raw(&self) -> usize {
        self.0
    }
}

/// Identifier of a file registered in a [`FileSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileId(u32);

static FIRST_LINE: [usize; 1] = [0];

/// A file of a [`FileSet`], covering positions `base..=base + size`.
#[derive(Debug, Clone)]
pub struct File {
    name: String,
    base: usize,
    size: usize,
    lines: &'static [usize],
}

impl File {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base(&self) -> usize {
        self.base
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Install a table of line start offsets.
    ///
    /// The table must start at offset 0, be strictly increasing and stay below the
    /// file size. Returns `false` (leaving the current table untouched) otherwise.
    /// Tables are `'static` so that a single process-wide table can be shared by
    /// every synthesized file.
    pub fn set_lines(&mut self, lines: &'static [usize]) -> bool {
        let ordered = lines.windows(2).all(|w| w[0] < w[1]);
        let bounded = lines.last().is_none_or(|&last| last < self.size.max(1));
        if !ordered || !bounded || lines.first().is_some_and(|&first| first != 0) {
            return false;
        }

        self.lines = lines;
        true
    }

    /// Position of the given byte offset. Offsets past the end of the file are
    /// clamped to the file size.
    pub fn pos(&self, offset: usize) -> Pos {
        Pos(self.base + offset.min(self.size))
    }

    fn line_column(&self, offset: usize) -> (usize, usize) {
        let line = self.lines.partition_point(|&start| start <= offset).max(1);
        let start = self.lines.get(line - 1).copied().unwrap_or(0);
        (line, offset - start + 1)
    }
}

/// A resolved source position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    pub filename: String,
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.filename, self.line, self.column)
    }
}

/// An ordered set of files sharing one position space.
///
/// Example:
/// ```rust
/// # use gotypes::position::FileSet;
/// let mut fset = FileSet::new();
/// let id = fset.add_file("a.go", 100);
/// let pos = fset.file(id).pos(0);
/// let resolved = fset.position(pos).unwrap();
/// assert_eq!((resolved.filename.as_str(), resolved.line, resolved.column), ("a.go", 1, 1));
/// ```
#[derive(Debug, Clone)]
pub struct FileSet {
    base: usize,
    files: Vec<File>,
}

impl Default for FileSet {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSet {
    pub fn new() -> Self {
        // Base 0 is reserved for `Pos::NONE`.
        Self {
            base: 1,
            files: Vec::new(),
        }
    }

    /// Register a new file spanning `size` bytes and return its identifier.
    pub fn add_file(&mut self, name: impl Into<String>, size: usize) -> FileId {
        let id = FileId(self.files.len() as u32);
        self.files.push(File {
            name: name.into(),
            base: self.base,
            size,
            lines: &FIRST_LINE,
        });
        self.base += size + 1;
        id
    }

    pub fn file(&self, id: FileId) -> &File {
        &self.files[id.0 as usize]
    }

    pub fn file_mut(&mut self, id: FileId) -> &mut File {
        &mut self.files[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn files(&self) -> impl Iterator<Item = &File> {
        self.files.iter()
    }

    /// Resolve `pos` into file name, line and column.
    pub fn position(&self, pos: Pos) -> Option<Position> {
        if !pos.is_valid() {
            return None;
        }

        let index = self.files.partition_point(|file| file.base <= pos.0);
        let file = self.files.get(index.checked_sub(1)?)?;
        let offset = pos.0 - file.base;
        if offset > file.size {
            return None;
        }

        let (line, column) = file.line_column(offset);
        Some(Position {
            filename: file.name.clone(),
            line,
            column,
        })
    }
}
