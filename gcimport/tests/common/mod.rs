//! Test-side writer producing export data streams.
#![allow(dead_code)]

use std::collections::HashMap;

use gcimport::tags::Tag;

/// Index of the first type after the predeclared ones.
pub const FIRST_TYPE: i64 = 30;

// Predeclared type indices.
pub const BOOL: i64 = 0;
pub const INT: i64 = 1;
pub const FLOAT64: i64 = 13;
pub const STRING: i64 = 16;
pub const ERROR: i64 = 19;
pub const UNTYPED_FLOAT: i64 = 23;
pub const UNTYPED_COMPLEX: i64 = 24;

/// Builds export data the way a producing compiler would.
///
/// Mirrors the decoder's string and package tables so that repeated strings
/// and packages are written as back-references.
pub struct ExportWriter {
    buf: Vec<u8>,
    debug: bool,
    pos_info: bool,
    track_all_types: bool,
    strings: HashMap<Vec<u8>, i64>,
    pkgs: HashMap<String, i64>,
    types: i64,
    prev_file: String,
    prev_line: i64,
}

impl ExportWriter {
    fn empty(debug: bool, track_all_types: bool, pos_info: bool) -> Self {
        Self {
            buf: Vec::new(),
            debug,
            pos_info,
            track_all_types,
            strings: HashMap::from([(Vec::new(), 0)]),
            pkgs: HashMap::new(),
            types: FIRST_TYPE,
            prev_file: String::new(),
            prev_line: 0,
        }
    }

    /// `version <n>` header followed by the flag block.
    pub fn new(version: u32, debug: bool, track_all_types: bool, pos_info: bool) -> Self {
        let mut w = Self::empty(false, track_all_types, pos_info);
        w.raw_str(&format!("version {version}\n"));
        w.raw_str(if debug { "debug\n" } else { "\n" });
        w.debug = debug;
        w.int(track_all_types as i64);
        w.int(pos_info as i64);
        w
    }

    /// Version 4, compact, named types only, no positions.
    pub fn compact() -> Self {
        Self::new(4, false, false, false)
    }

    /// Legacy single-byte header (format version 0).
    pub fn legacy(debug: bool, track_all_types: bool, pos_info: bool) -> Self {
        let mut w = Self::empty(debug, track_all_types, pos_info);
        w.raw_byte(if debug { b'd' } else { b'c' });
        w.raw_byte(if track_all_types { b'a' } else { b'n' });
        w.int(pos_info as i64);
        w.string("v1");
        w
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }

    pub fn raw_byte(&mut self, b: u8) {
        match b {
            b'$' => self.buf.extend_from_slice(b"|S"),
            b'|' => self.buf.extend_from_slice(b"||"),
            b => self.buf.push(b),
        }
    }

    fn raw_str(&mut self, s: &str) {
        for b in s.bytes() {
            self.raw_byte(b);
        }
    }

    pub fn raw_varint(&mut self, x: i64) {
        let mut ux = (x as u64) << 1;
        if x < 0 {
            ux = !ux;
        }
        while ux >= 0x80 {
            self.raw_byte(ux as u8 | 0x80);
            ux >>= 7;
        }
        self.raw_byte(ux as u8);
    }

    fn marker(&mut self, m: u8) {
        if self.debug {
            self.raw_byte(m);
            let pos = self.buf.len() as i64;
            self.raw_varint(pos);
        }
    }

    pub fn tag(&mut self, tag: i64) {
        self.marker(b't');
        self.raw_varint(tag);
    }

    pub fn int(&mut self, x: i64) {
        self.marker(b'i');
        self.raw_varint(x);
    }

    pub fn bytes(&mut self, bytes: &[u8]) {
        self.marker(b's');
        if let Some(&index) = self.strings.get(bytes) {
            self.raw_varint(index);
            return;
        }
        let index = self.strings.len() as i64;
        self.strings.insert(bytes.to_vec(), index);
        self.raw_varint(-(bytes.len() as i64));
        for &b in bytes {
            self.raw_byte(b);
        }
    }

    pub fn string(&mut self, s: &str) {
        self.bytes(s.as_bytes());
    }

    /// Package record; `path` is empty for the package being imported.
    pub fn pkg(&mut self, name: &str, path: &str) {
        if let Some(&index) = self.pkgs.get(path) {
            self.tag(index);
            return;
        }
        let index = self.pkgs.len() as i64;
        self.pkgs.insert(path.to_owned(), index);
        self.tag(Tag::Package.value());
        self.string(name);
        self.string(path);
    }

    pub fn pos(&mut self, file: &str, line: i64) {
        if !self.pos_info {
            return;
        }
        if file == self.prev_file {
            let delta = line - self.prev_line;
            self.int(delta);
            if delta == 0 {
                self.int(-1);
            }
        } else {
            let prefix = self
                .prev_file
                .bytes()
                .zip(file.bytes())
                .take_while(|(a, b)| a == b)
                .count();
            self.int(0);
            self.int(prefix as i64);
            self.string(&file[prefix..]);
            self.int(line);
            self.prev_file = file.to_owned();
        }
        self.prev_line = line;
    }

    /// Exact encoding of a float64 constant.
    pub fn float(&mut self, x: f64) {
        if x == 0.0 {
            self.int(0);
            return;
        }
        let bits = x.abs().to_bits();
        let biased = ((bits >> 52) & 0x7FF) as i64;
        let frac = bits & ((1 << 52) - 1);
        let (mut mant, mut exp) = if biased == 0 {
            (frac, -1074)
        } else {
            (frac | 1 << 52, biased - 1075)
        };
        let tz = mant.trailing_zeros();
        mant >>= tz;
        exp += tz as i64;
        let len = 64 - mant.leading_zeros() as i64;

        self.int(if x < 0.0 { -1 } else { 1 });
        self.int(exp + len);
        let bytes = mant.to_be_bytes();
        let skip = bytes.iter().take_while(|b| **b == 0).count();
        self.bytes(&bytes[skip..]);
    }

    /// Type back-reference.
    pub fn type_ref(&mut self, index: i64) {
        self.tag(index);
    }

    /// Tag of a named type plus its position and name. Returns its index.
    ///
    /// The position repeats the previous one.
    pub fn named(&mut self, name: &str, pkg_name: &str, pkg_path: &str) -> i64 {
        self.tag(Tag::Named.value());
        let (file, line) = (self.prev_file.clone(), self.prev_line);
        self.pos(&file, line);
        self.string(name);
        self.pkg(pkg_name, pkg_path);
        let index = self.types;
        self.types += 1;
        index
    }

    /// Tag of a composite type. Returns its index when types are tracked.
    pub fn composite(&mut self, tag: Tag) -> Option<i64> {
        self.tag(tag.value());
        self.track()
    }

    /// Claim the next type index if composite types are tracked.
    pub fn track(&mut self) -> Option<i64> {
        if !self.track_all_types {
            return None;
        }
        let index = self.types;
        self.types += 1;
        Some(index)
    }

    /// Unnamed parameter list of predeclared or back-referenced types.
    pub fn unnamed_params(&mut self, types: &[i64]) {
        self.int(-(types.len() as i64));
        for &ty in types {
            self.type_ref(ty);
            self.string("");
        }
    }

    /// Named parameter list of the current package.
    pub fn named_params(&mut self, pkg: &str, params: &[(&str, i64)]) {
        self.int(params.len() as i64);
        for &(name, ty) in params {
            self.type_ref(ty);
            self.string(name);
            if name != "_" {
                self.pkg(pkg, "");
            }
            self.string("");
        }
    }

    pub fn end(&mut self, count: i64) {
        self.tag(Tag::End.value());
        self.int(count);
    }
}

/// A universe, file set and package map shared by consecutive imports.
pub struct Session {
    pub universe: gotypes::universe::Universe,
    pub fset: gotypes::position::FileSet,
    pub imports: HashMap<String, gotypes::package::PackageId>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            universe: gotypes::universe::Universe::new(),
            fset: gotypes::position::FileSet::new(),
            imports: HashMap::new(),
        }
    }

    pub fn import(
        &mut self,
        data: &[u8],
        path: &str,
    ) -> gcimport::ImportResult<(usize, gotypes::package::PackageId)> {
        gcimport::import_data(
            &mut self.universe,
            &mut self.fset,
            &mut self.imports,
            data,
            path,
        )
    }

    /// Import `data` as `example.com/demo`, expecting success.
    pub fn import_demo(&mut self, data: &[u8]) -> gotypes::package::PackageId {
        match self.import(data, "example.com/demo") {
            Ok((read, pkg)) => {
                assert_eq!(read, data.len());
                pkg
            }
            Err(err) => panic!("import failed: {err}"),
        }
    }

    /// Import `data` as `example.com/demo`, expecting a format error.
    pub fn import_error(&mut self, data: &[u8]) -> gcimport::FormatError {
        match self.import(data, "example.com/demo") {
            Ok(_) => panic!("import unexpectedly succeeded"),
            Err(err) => err.source,
        }
    }

    /// The type of the object `name` declared in `pkg`.
    pub fn type_of(&self, pkg: gotypes::package::PackageId, name: &str) -> gotypes::types::TypeId {
        let obj = self.universe.lookup(pkg, name).expect("object is declared");
        self.universe.object(obj).ty().expect("object has a type")
    }
}
