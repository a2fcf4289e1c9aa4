use once_cell::sync::Lazy;
use regex::Regex;

pub const DEFAULT_INDEX_URL: &str = "https://pypi.python.org/pypi";

static IDENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        ^(?:(?P<index>https?://[^/]+/pypi)/)?
        (?P<name>[-A-Za-z0-9_.]+)
        (?:/(?P<version>[-A-Za-z0-9.]+))?$",
    )
    .unwrap()
});

/// A package reference, optionally qualified with an index base URL and a
/// version: `name`, `name/version`, `https://host/pypi/name[/version]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageIdentifier {
    pub base_url: String,
    pub name: String,
    pub version: Option<String>,
}

impl PackageIdentifier {
    /// Parse a free-form identifier string. Returns `None` when the input
    /// does not look like a package identifier at all; that is a signal to
    /// hand the input to another resolver, never an error.
    pub fn parse(input: &str) -> Option<Self> {
        let caps = IDENT_RE.captures(input)?;
        Some(PackageIdentifier {
            base_url: caps
                .name("index")
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| DEFAULT_INDEX_URL.to_string()),
            name: caps["name"].to_string(),
            version: caps.name("version").map(|m| m.as_str().to_string()),
        })
    }
}

/// Applicability hint for the host dispatcher. The literal substring `pypi`
/// counts as a hint on its own, independent of the structured pattern.
pub fn matches(input: &str) -> bool {
    input.contains("pypi") || IDENT_RE.is_match(input)
}
