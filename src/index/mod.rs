//! Package index pages: URL construction and archive link selection.
//!
//! The index page for a package is found by plain string concatenation of a
//! base URL, the package name and a fixed suffix. With the defaults this is
//! `https://pypi.org/project/<name>/#files`.

mod links;

pub use links::{CandidateLinks, scan_links};

/// Default index base URL.
pub const DEFAULT_INDEX_URL: &str = "https://pypi.org/project/";

/// Default suffix appended after the package name.
pub const DEFAULT_INDEX_SUFFIX: &str = "/#files";

/// Where package index pages live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexLocation {
    base_url: String,
    suffix: String,
}

impl Default for IndexLocation {
    fn default() -> Self {
        Self::new(DEFAULT_INDEX_URL, DEFAULT_INDEX_SUFFIX)
    }
}

impl IndexLocation {
    /// Creates an index location from a base URL and suffix.
    #[must_use]
    pub fn new(base_url: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            suffix: suffix.into(),
        }
    }

    /// Returns the index page URL for `package`.
    #[must_use]
    pub fn page_url(&self, package: &str) -> String {
        format!("{}{package}{}", self.base_url, self.suffix)
    }

    /// Builds the request for one package.
    #[must_use]
    pub fn request(&self, package: &str) -> PackageRequest {
        PackageRequest {
            name: package.to_string(),
            page_url: self.page_url(package),
        }
    }
}

/// A package name paired with its resolved index page URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRequest {
    /// Package name as requested.
    pub name: String,
    /// Index page to scan for source archives.
    pub page_url: String,
}
