mod chart;
mod error;
mod ident;
mod package;
mod pypi;

pub use error::{Error, Result};
pub use ident::{matches, PackageIdentifier, DEFAULT_INDEX_URL};
pub use package::{Package, PackageStats};
pub use pypi::{Client, Info, Metadata, RecentDownloads, ReleaseFile};

/// The numeric pair handed back to the host framework.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Summary {
    pub downloads: i64,
    pub average_downloads: i64,
}

/// Single entry point for a host dispatcher: resolve the identifier string,
/// fetch the package's metadata, and reduce it to the summary pair. Richer
/// per-version data stays available through [`Package::fetch`] directly.
pub async fn lookup(input: &str) -> Result<Summary> {
    let stats = Package::from_input(input)?.fetch().await?;

    Ok(Summary {
        downloads: stats.downloads(),
        average_downloads: stats.average_downloads(),
    })
}
