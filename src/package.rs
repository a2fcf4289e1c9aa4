use crate::chart;
use crate::error::{Error, Result};
use crate::ident::PackageIdentifier;
use crate::pypi::{Client, Metadata, RecentDownloads};
use chrono::NaiveDateTime;
use log::warn;

const UPLOAD_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// One package lookup against one index. Each instance performs exactly one
/// fetch and is discarded once the caller has read what it needs.
pub struct Package {
    ident: PackageIdentifier,
    client: Client,
}

impl Package {
    pub fn new(ident: PackageIdentifier) -> Result<Self> {
        Ok(Package {
            ident,
            client: Client::new()?,
        })
    }

    /// Resolve a free-form identifier string straight into a `Package`.
    /// A string that does not look like a package identifier yields
    /// `NotApplicable`.
    pub fn from_input(input: &str) -> Result<Self> {
        let ident = PackageIdentifier::parse(input)
            .ok_or_else(|| Error::NotApplicable(input.to_string()))?;
        Package::new(ident)
    }

    pub fn name(&self) -> &str {
        &self.ident.name
    }

    /// Perform the single network fetch and compute every derived view
    /// eagerly. The document is small, so precomputing removes any need for
    /// per-accessor memoization.
    pub async fn fetch(&self) -> Result<PackageStats> {
        let metadata = self
            .client
            .fetch_metadata(&self.ident.base_url, &self.ident.name)
            .await?;
        Ok(PackageStats::new(metadata))
    }
}

/// Read-only derived views over one fetched metadata document.
pub struct PackageStats {
    metadata: Metadata,
    versions: Vec<String>,
    version_downloads: Vec<(String, i64)>,
    version_dates: Vec<(String, NaiveDateTime)>,
    downloads: i64,
}

impl PackageStats {
    pub fn new(metadata: Metadata) -> Self {
        // Versions with no uploaded files carry no date and no downloads;
        // they are excluded from every view. The remainder is ordered by the
        // first file's upload time, ascending.
        let mut release_info: Vec<_> = metadata
            .releases
            .iter()
            .filter(|(_, files)| !files.is_empty())
            .collect();
        release_info.sort_by(|a, b| {
            a.1[0]
                .upload_time
                .cmp(&b.1[0].upload_time)
                .then_with(|| a.0.cmp(b.0))
        });

        let mut versions = Vec::with_capacity(release_info.len());
        let mut version_downloads = Vec::with_capacity(release_info.len());
        let mut version_dates = Vec::with_capacity(release_info.len());

        for (version, files) in &release_info {
            versions.push((*version).clone());
            version_downloads.push((
                (*version).clone(),
                files.iter().map(|file| file.downloads).sum(),
            ));
            match NaiveDateTime::parse_from_str(&files[0].upload_time, UPLOAD_TIME_FORMAT) {
                Ok(date) => version_dates.push(((*version).clone(), date)),
                Err(err) => warn!(
                    "unparseable upload time {:?} for version {}: {}",
                    files[0].upload_time, version, err
                ),
            }
        }

        let downloads = version_downloads.iter().map(|(_, n)| n).sum();

        PackageStats {
            metadata,
            versions,
            version_downloads,
            version_dates,
            downloads,
        }
    }

    /// Version names in ascending first-release-date order.
    pub fn versions(&self) -> &[String] {
        &self.versions
    }

    /// Per-version download totals, in `versions` order.
    pub fn version_downloads(&self) -> &[(String, i64)] {
        &self.version_downloads
    }

    /// First-upload timestamp per version, in `versions` order. Versions
    /// whose timestamp does not parse are omitted.
    pub fn version_dates(&self) -> &[(String, NaiveDateTime)] {
        &self.version_dates
    }

    /// Total downloads across all versions.
    pub fn downloads(&self) -> i64 {
        self.downloads
    }

    /// The version with the most downloads and its count; ties go to the
    /// earliest-released version. `(None, 0)` when nothing qualifies.
    pub fn max_version(&self) -> (Option<&str>, i64) {
        let mut best: Option<(&str, i64)> = None;
        for (version, count) in &self.version_downloads {
            if best.map_or(true, |(_, n)| *count > n) {
                best = Some((version, *count));
            }
        }
        match best {
            Some((version, count)) => (Some(version), count),
            None => (None, 0),
        }
    }

    /// The version with the fewest downloads; same shape as `max_version`.
    pub fn min_version(&self) -> (Option<&str>, i64) {
        let mut best: Option<(&str, i64)> = None;
        for (version, count) in &self.version_downloads {
            if best.map_or(true, |(_, n)| *count < n) {
                best = Some((version, *count));
            }
        }
        match best {
            Some((version, count)) => (Some(version), count),
            None => (None, 0),
        }
    }

    /// Integer-divided average downloads per version; 0 when there are no
    /// qualifying versions.
    pub fn average_downloads(&self) -> i64 {
        if self.versions.is_empty() {
            0
        } else {
            self.downloads / self.versions.len() as i64
        }
    }

    pub fn author(&self) -> Option<&str> {
        self.metadata.info.author.as_deref()
    }

    pub fn author_email(&self) -> Option<&str> {
        self.metadata.info.author_email.as_deref()
    }

    pub fn maintainer(&self) -> Option<&str> {
        self.metadata.info.maintainer.as_deref()
    }

    pub fn maintainer_email(&self) -> Option<&str> {
        self.metadata.info.maintainer_email.as_deref()
    }

    pub fn summary(&self) -> Option<&str> {
        self.metadata.info.summary.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.metadata.info.description.as_deref()
    }

    pub fn license(&self) -> Option<&str> {
        self.metadata.info.license.as_deref()
    }

    pub fn home_page(&self) -> Option<&str> {
        self.metadata.info.home_page.as_deref()
    }

    pub fn docs_url(&self) -> Option<&str> {
        self.metadata.info.docs_url.as_deref()
    }

    pub fn downloads_last_day(&self) -> Result<i64> {
        Ok(self.recent_downloads("info.downloads.last_day")?.last_day)
    }

    pub fn downloads_last_week(&self) -> Result<i64> {
        Ok(self.recent_downloads("info.downloads.last_week")?.last_week)
    }

    pub fn downloads_last_month(&self) -> Result<i64> {
        Ok(self.recent_downloads("info.downloads.last_month")?.last_month)
    }

    pub fn package_url(&self) -> Result<&str> {
        self.metadata
            .info
            .package_url
            .as_deref()
            .ok_or(Error::MissingField("info.package_url"))
    }

    fn recent_downloads(&self, path: &'static str) -> Result<&RecentDownloads> {
        self.metadata
            .info
            .downloads
            .as_ref()
            .ok_or(Error::MissingField(path))
    }

    /// Per-version download chart, one bar per version in release order.
    pub fn chart(&self) -> String {
        let rows: Vec<_> = self
            .version_downloads
            .iter()
            .map(|(version, count)| {
                let date = self
                    .version_dates
                    .iter()
                    .find(|(v, _)| v == version)
                    .map(|(_, d)| d.format(DATE_FORMAT).to_string())
                    .unwrap_or_default();
                (format!("{:<20} {}", version, date), *count)
            })
            .collect();
        chart::bargraph(&rows)
    }
}
