//! Export format versions and the flags they select.
use strum::FromRepr;

/// A supported export format version.
///
/// Version 0 is the legacy encoding announced by a single `'c'`/`'d'` byte;
/// later versions announce themselves with a `version <N>` header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, FromRepr)]
#[repr(u8)]
pub enum FormatVersion {
    V0 = 0,
    V1 = 1,
    V2 = 2,
    V3 = 3,
    V4 = 4,
}

/// Behavior that depends on the format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionInfo {
    pub version: FormatVersion,
    /// A block with the debug mode, track-all-types and position flags follows
    /// the header line.
    pub flag_block: bool,
    /// Fields named `_` are followed by a package record.
    pub blank_field_package: bool,
}

const VERSION_TABLE: [VersionInfo; 5] = [
    VersionInfo {
        version: FormatVersion::V0,
        flag_block: false,
        blank_field_package: false,
    },
    VersionInfo {
        version: FormatVersion::V1,
        flag_block: true,
        blank_field_package: true,
    },
    VersionInfo {
        version: FormatVersion::V2,
        flag_block: true,
        blank_field_package: true,
    },
    VersionInfo {
        version: FormatVersion::V3,
        flag_block: true,
        blank_field_package: true,
    },
    VersionInfo {
        version: FormatVersion::V4,
        flag_block: true,
        blank_field_package: true,
    },
];

impl FormatVersion {
    /// Look up a version number read from the header.
    pub fn from_number(version: i64) -> Option<Self> {
        u8::try_from(version).ok().and_then(Self::from_repr)
    }

    pub fn info(self) -> &'static VersionInfo {
        &VERSION_TABLE[self as usize]
    }
}

/// Flags selected by the header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatFlags {
    /// Every read is preceded by a self-checking marker.
    pub debug: bool,
    /// Every composite type is interned, not only named types.
    pub track_all_types: bool,
    /// Objects and fields carry source positions.
    pub pos_info: bool,
}

/// Extract the version number of a `version <N> ...` header line.
///
/// Trailing tokens are ignored. Returns `None` for anything else, including
/// non-positive numbers.
pub fn parse_version_line(line: &str) -> Option<i64> {
    let mut parts = line.splitn(3, ' ');
    if parts.next()? != "version" {
        return None;
    }
    parts.next()?.parse().ok().filter(|v: &i64| *v > 0)
}
