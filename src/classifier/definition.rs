use serde::{Deserialize, Serialize};

/// A lightweight placeholder that stands in for a product until interaction
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Facade {
    /// Display name (e.g., "Lite YouTube Embed")
    pub name: String,

    /// Reference link, usually the source repository
    pub repo: String,
}

/// A specific offering of an entity (widget, player, SDK)
///
/// # Example TOML
/// ```toml
/// [[entity.product]]
/// name = "YouTube Embedded Player"
/// url_patterns = ["youtube.com/embed/"]
///
/// [[entity.product.facade]]
/// name = "Lite YouTube Embed"
/// repo = "https://github.com/paulirish/lite-youtube-embed"
/// ```
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Product {
    pub name: String,

    /// Owning entity name; filled in by the registry, never read from TOML
    #[serde(skip)]
    pub entity: String,

    /// URL patterns matched against the URL with its scheme removed.
    ///
    /// A trailing `*` requires a prefix match; otherwise the pattern may
    /// appear anywhere in the URL.
    pub url_patterns: Vec<String>,

    /// Ordered facade alternatives; the first is the suggested one
    #[serde(default, rename = "facade", skip_serializing_if = "Vec::is_empty")]
    pub facades: Vec<Facade>,
}

impl Product {
    /// Whether any of this product's patterns matches `url`
    pub fn matches(&self, url: &str) -> bool {
        let target = strip_scheme(url);
        self.url_patterns.iter().any(|pattern| match pattern.strip_suffix('*') {
            Some(prefix) => target.starts_with(prefix),
            None => target.contains(pattern.as_str()),
        })
    }

    pub fn has_facade(&self) -> bool {
        !self.facades.is_empty()
    }

    /// First facade in the list, if the product has any
    pub fn suggested_facade(&self) -> Option<&Facade> {
        self.facades.first()
    }
}

/// An organization owning one or more delivery domains
///
/// # Example TOML
/// ```toml
/// [[entity]]
/// name = "YouTube"
/// homepage = "https://youtube.com"
/// domains = ["*.youtube.com", "*.ytimg.com", "youtu.be"]
/// ```
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Entity {
    /// Unique entity name
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,

    /// Exact hosts (`www.example.com`) or wildcard suffixes (`*.example.com`)
    pub domains: Vec<String>,

    #[serde(default, rename = "product", skip_serializing_if = "Vec::is_empty")]
    pub products: Vec<Product>,
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Entity {}

fn strip_scheme(url: &str) -> &str {
    match url.find("://") {
        Some(pos) => &url[pos + 3..],
        None => url,
    }
}
