//! Header parsing, package records and the top-level object loop.
use std::collections::HashMap;

use gotypes::{
    package::PackageId,
    position::FileSet,
    types::TypeId,
    universe::Universe,
};
use log::{debug, trace};

use crate::{
    config::ImportConfig,
    error::{FormatError, FormatResult, ImportError, ImportResult},
    intern::{InternTable, TableKind, TypeEntry},
    position::PosSynthesizer,
    reader::Reader,
    tags::Tag,
    version::{FormatFlags, FormatVersion, VersionInfo, parse_version_line},
};

/// State of one decode call.
pub(crate) struct Importer<'a> {
    pub(crate) universe: &'a mut Universe,
    pub(crate) fset: &'a mut FileSet,
    imports: &'a mut HashMap<String, PackageId>,
    path: &'a str,
    pub(crate) config: &'a ImportConfig,

    pub(crate) reader: Reader<'a>,
    pub(crate) version: &'static VersionInfo,
    pub(crate) flags: FormatFlags,

    strings: InternTable<Box<[u8]>>,
    pub(crate) pkgs: InternTable<PackageId>,
    pub(crate) types: InternTable<TypeEntry>,
    pub(crate) positions: PosSynthesizer,

    /// Interfaces built by this decode, completed once the object stream ends.
    pub(crate) interfaces: Vec<TypeId>,
    pub(crate) depth: usize,
    /// Paths this decode added to the caller's package map.
    added: Vec<String>,
}

impl<'a> Importer<'a> {
    pub(crate) fn new(
        universe: &'a mut Universe,
        fset: &'a mut FileSet,
        imports: &'a mut HashMap<String, PackageId>,
        data: &'a [u8],
        path: &'a str,
        config: &'a ImportConfig,
    ) -> Self {
        Self {
            universe,
            fset,
            imports,
            path,
            config,
            reader: Reader::new(data),
            version: FormatVersion::V0.info(),
            flags: FormatFlags::default(),
            strings: InternTable::with_entries(TableKind::String, [Box::default()]),
            pkgs: InternTable::new(TableKind::Package),
            types: InternTable::new(TableKind::Type),
            positions: PosSynthesizer::default(),
            interfaces: Vec::new(),
            depth: 0,
            added: Vec::new(),
        }
    }

    /// Decode the whole stream and return the current package.
    pub(crate) fn run(&mut self) -> FormatResult<PackageId> {
        self.read_header()?;

        let predeclared = self.universe.predeclared().iter().copied().map(TypeEntry::Type);
        self.types = InternTable::with_entries(TableKind::Type, predeclared);

        let pkg = self.pkg()?;

        let mut count = 0;
        loop {
            let tag = self.reader.tag_or_index()?;
            if tag == Tag::End.value() {
                break;
            }
            self.object(tag)?;
            count += 1;
        }

        let want = self.reader.int()?;
        if usize::try_from(want).ok() != Some(count) {
            return Err(FormatError::ObjectCountMismatch { got: count, want });
        }

        // Anything after the count is private to the producing compiler.

        let interfaces = std::mem::take(&mut self.interfaces);
        let completed = interfaces
            .into_iter()
            .filter(|&iface| self.universe.complete_interface(iface))
            .count();
        trace!("Completed {} interfaces", completed);

        let mut imports: Vec<PackageId> = self.pkgs.iter().skip(1).copied().collect();
        imports.sort_by(|a, b| {
            let (a, b) = (self.universe.package(*a), self.universe.package(*b));
            a.path().cmp(b.path())
        });
        imports.dedup();

        let package = self.universe.package_mut(pkg);
        package.set_imports(imports);
        package.mark_complete();
        debug!(
            "Imported package {:?} ({} objects, {} bytes)",
            package.path(),
            count,
            self.reader.read()
        );

        Ok(pkg)
    }

    fn read_header(&mut self) -> FormatResult<()> {
        let first = self.reader.raw_byte()?;
        let (number, text) = if first == b'c' || first == b'd' {
            // Legacy encoding: the first byte selects compact or debug mode.
            self.reader.set_debug(first == b'd');
            self.flags.track_all_types = self.reader.raw_byte()? == b'a';
            self.flags.pos_info = self.reader.int()? != 0;
            let text = self.string()?;
            let number = if text == "v1" { 0 } else { -1 };
            (number, text)
        } else {
            let text = self.reader.raw_stringln(first)?;
            (parse_version_line(&text).unwrap_or(-1), text)
        };

        let version = FormatVersion::from_number(number)
            .ok_or(FormatError::UnknownVersion {
                version: number,
                text,
            })?
            .info();

        if version.flag_block {
            let first = self.reader.raw_byte()?;
            let mode = self.reader.raw_stringln(first)?;
            self.reader.set_debug(mode == "debug");
            self.flags.track_all_types = self.reader.int()? != 0;
            self.flags.pos_info = self.reader.int()? != 0;
        }
        self.flags.debug = self.reader.is_debug();
        self.version = version;

        debug!(
            "Export data for {:?}: format {:?}, {:?}",
            self.path, version.version, self.flags
        );
        Ok(())
    }

    /// Raw bytes of a string record.
    pub(crate) fn string_bytes(&mut self) -> FormatResult<Box<[u8]>> {
        let header = self.reader.string_header()?;
        if header >= 0 {
            return self.strings.get(header).cloned();
        }

        let bytes: Box<[u8]> = self.reader.raw_bytes(header.unsigned_abs())?.into();
        self.strings.push(bytes.clone());
        Ok(bytes)
    }

    pub(crate) fn string(&mut self) -> FormatResult<String> {
        let bytes = self.string_bytes()?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// A package record: a back-reference or a new `(name, path)` entry.
    pub(crate) fn pkg(&mut self) -> FormatResult<PackageId> {
        let tag = self.reader.tag_or_index()?;
        if tag >= 0 {
            return self.pkgs.get(tag).copied();
        }
        if tag != Tag::Package.value() {
            return Err(FormatError::UnexpectedTag {
                context: "package",
                tag,
            });
        }

        let name = self.string()?;
        let mut path = self.string()?;

        if name.is_empty() {
            return Err(FormatError::EmptyPackageName);
        }
        // The empty path denotes the package being imported and comes first.
        if path.is_empty() != self.pkgs.is_empty() {
            return Err(FormatError::BadPackagePath {
                path,
                index: self.pkgs.len(),
            });
        }
        if path.is_empty() {
            path = self.path.to_owned();
        }

        let pkg = match self.imports.get(&path) {
            Some(&pkg) => {
                let existing = self.universe.package(pkg).name();
                if existing != name {
                    return Err(FormatError::ConflictingNames {
                        existing: existing.to_owned(),
                        name,
                        path,
                    });
                }
                pkg
            }
            None => {
                let pkg = self.universe.new_package(path.clone(), name);
                self.imports.insert(path.clone(), pkg);
                self.added.push(path);
                pkg
            }
        };

        self.pkgs.push(pkg);
        Ok(pkg)
    }

    /// The package being imported.
    pub(crate) fn current_pkg(&self) -> FormatResult<PackageId> {
        self.pkgs
            .first()
            .copied()
            .ok_or(FormatError::IndexOutOfRange {
                table: TableKind::Package,
                index: 0,
                len: 0,
            })
    }

    /// Drop the packages this decode registered with the caller.
    fn rollback(&mut self) {
        for path in self.added.drain(..) {
            self.imports.remove(&path);
        }
    }
}

/// Decode export data with the default [`ImportConfig`].
///
/// `imports` maps import paths to packages already known to the caller; it is
/// read and extended in place so that every package is created at most once
/// per map. `path` is the import path of the package being decoded. Returns
/// the number of bytes consumed and the package.
///
/// On failure no package is returned and the entries this call added to
/// `imports` are removed again. Declarations already inserted into the scope
/// of a package the caller supplied stay there, including type names whose
/// underlying type was never decoded.
pub fn import_data(
    universe: &mut Universe,
    fset: &mut FileSet,
    imports: &mut HashMap<String, PackageId>,
    data: &[u8],
    path: &str,
) -> ImportResult<(usize, PackageId)> {
    import_data_with_config(universe, fset, imports, data, path, &ImportConfig::default())
}

/// Decode export data with explicit resource ceilings.
pub fn import_data_with_config(
    universe: &mut Universe,
    fset: &mut FileSet,
    imports: &mut HashMap<String, PackageId>,
    data: &[u8],
    path: &str,
    config: &ImportConfig,
) -> ImportResult<(usize, PackageId)> {
    if let Some(max) = config.max_input_len {
        if data.len() > max {
            return Err(FormatError::InputTooLarge {
                len: data.len(),
                max,
            }
            .into());
        }
    }

    let mut importer = Importer::new(universe, fset, imports, data, path, config);
    match importer.run() {
        Ok(pkg) => Ok((importer.reader.read(), pkg)),
        Err(source) => {
            debug!("Import of {:?} failed: {}", path, source);
            importer.rollback();
            Err(ImportError { source })
        }
    }
}
