//! Source archive formats recognised on index pages.

use std::fmt;

/// Extension of gzip-compressed tarballs.
pub const TAR_EXTENSION: &str = ".tar.gz";

/// Extension of zip archives.
pub const ZIP_EXTENSION: &str = ".zip";

/// Source archive format, chosen by filename suffix.
///
/// Variants are declared in download priority order: a tarball is always
/// preferred over a zip when both are offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArchiveKind {
    /// `.tar.gz` source distribution.
    Tarball,
    /// `.zip` source distribution.
    Zip,
}

impl ArchiveKind {
    /// All kinds in priority order.
    pub const PRIORITY: [Self; 2] = [Self::Tarball, Self::Zip];

    /// Returns the filename suffix for this kind.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Tarball => TAR_EXTENSION,
            Self::Zip => ZIP_EXTENSION,
        }
    }

    /// Classifies a link or filename by its trailing extension.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::PRIORITY
            .into_iter()
            .find(|kind| name.ends_with(kind.extension()))
    }

    /// Derives the extracted project directory name from the archive filename.
    ///
    /// Tarballs drop the last two dot-separated suffixes
    /// (`numpy-1.15.4.tar.gz` becomes `numpy-1.15.4`), zips drop one.
    #[must_use]
    pub fn project_root_name(self, filename: &str) -> String {
        let suffixes = match self {
            Self::Tarball => 2,
            Self::Zip => 1,
        };
        let mut stem = filename;
        for _ in 0..suffixes {
            if let Some((head, _)) = stem.rsplit_once('.') {
                stem = head;
            }
        }
        stem.to_string()
    }
}

impl fmt::Display for ArchiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tarball => write!(f, "tarball"),
            Self::Zip => write!(f, "zip"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_classifies_by_suffix() {
        assert_eq!(
            ArchiveKind::from_name("requests-2.20.1.tar.gz"),
            Some(ArchiveKind::Tarball)
        );
        assert_eq!(
            ArchiveKind::from_name("numpy-1.15.4.zip"),
            Some(ArchiveKind::Zip)
        );
        assert_eq!(ArchiveKind::from_name("numpy-1.15.4-cp37-none.whl"), None);
        assert_eq!(ArchiveKind::from_name("data.gz"), None);
    }

    #[test]
    fn test_priority_prefers_tarball() {
        assert!(ArchiveKind::Tarball < ArchiveKind::Zip);
        assert_eq!(ArchiveKind::PRIORITY[0], ArchiveKind::Tarball);
    }

    #[test]
    fn test_project_root_name_for_tarball_strips_two_suffixes() {
        assert_eq!(
            ArchiveKind::Tarball.project_root_name("numpy-1.15.4.tar.gz"),
            "numpy-1.15.4"
        );
    }

    #[test]
    fn test_project_root_name_for_zip_strips_one_suffix() {
        assert_eq!(
            ArchiveKind::Zip.project_root_name("numpy-1.15.4.zip"),
            "numpy-1.15.4"
        );
    }

    #[test]
    fn test_project_root_name_without_dots_is_unchanged() {
        assert_eq!(ArchiveKind::Zip.project_root_name("archive"), "archive");
    }

    #[test]
    fn test_display() {
        assert_eq!(ArchiveKind::Tarball.to_string(), "tarball");
        assert_eq!(ArchiveKind::Zip.to_string(), "zip");
    }
}
