use crate::classifier::{ClassifierError, Entity, Product};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Read-only URL classification service consumed by the audit
///
/// Injected rather than global so tests and callers can supply their own
/// database.
pub trait ResourceClassifier {
    /// Entity owning the URL's host, if known
    fn entity_of(&self, url: &str) -> Option<&Entity>;

    /// Product the URL belongs to, if any
    fn product_of(&self, url: &str) -> Option<&Product>;

    /// Whether `url` belongs to the same entity as the main document.
    ///
    /// With no main entity nothing is first-party.
    fn is_first_party(&self, url: &str, main_entity: Option<&Entity>) -> bool {
        match (self.entity_of(url), main_entity) {
            (Some(entity), Some(main)) => entity == main,
            _ => false,
        }
    }
}

/// Entity/product/facade database loaded from TOML
///
/// # Example Usage
/// ```no_run
/// use facade_finder::classifier::{EntityRegistry, ResourceClassifier};
///
/// let registry = EntityRegistry::from_toml("entities.toml")?;
/// if let Some(product) = registry.product_of("https://www.youtube.com/embed/abc") {
///     println!("{} ({} facades)", product.name, product.facades.len());
/// }
/// # Ok::<(), facade_finder::classifier::ClassifierError>(())
/// ```
#[derive(Debug)]
pub struct EntityRegistry {
    entities: Vec<Entity>,

    /// Exact host → entity index
    exact_hosts: HashMap<String, usize>,

    /// `*.suffix` domains as (suffix, entity index)
    wildcard_suffixes: Vec<(String, usize)>,
}

#[derive(serde::Deserialize)]
struct EntityFile {
    #[serde(default)]
    entity: Vec<Entity>,
}

impl EntityRegistry {
    /// Load an entity database from a TOML file
    ///
    /// # Errors
    /// Returns error if the file can't be read, has invalid TOML syntax,
    /// lists a domain under two entities, or defines a product without
    /// URL patterns.
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self, ClassifierError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|source| ClassifierError::Io {
            path: path.as_ref().display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse an entity database from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ClassifierError> {
        let file: EntityFile = toml::from_str(content)?;
        Self::from_entities(file.entity)
    }

    /// Load the database compiled into the binary
    pub fn default_database() -> Result<Self, ClassifierError> {
        const DEFAULT_TOML: &str = include_str!("../../entities-default.toml");
        Self::from_toml_str(DEFAULT_TOML)
    }

    /// Build a registry from already-constructed entities
    pub fn from_entities(mut entities: Vec<Entity>) -> Result<Self, ClassifierError> {
        let mut exact_hosts = HashMap::new();
        let mut wildcard_suffixes = Vec::new();
        let mut seen_domains: HashMap<String, String> = HashMap::new();
        let mut seen_names: HashMap<String, usize> = HashMap::new();

        for (idx, entity) in entities.iter_mut().enumerate() {
            if seen_names.insert(entity.name.clone(), idx).is_some() {
                return Err(ClassifierError::DuplicateEntity(entity.name.clone()));
            }

            for product in &mut entity.products {
                if product.url_patterns.is_empty() {
                    return Err(ClassifierError::EmptyProduct {
                        entity: entity.name.clone(),
                        product: product.name.clone(),
                    });
                }
                product.entity = entity.name.clone();
            }

            for domain in &entity.domains {
                let domain = domain.to_ascii_lowercase();
                if let Some(existing) = seen_domains.insert(domain.clone(), entity.name.clone()) {
                    return Err(ClassifierError::DuplicateDomain {
                        domain,
                        first: existing,
                        second: entity.name.clone(),
                    });
                }

                match domain.strip_prefix("*.") {
                    Some(suffix) => wildcard_suffixes.push((suffix.to_string(), idx)),
                    None => {
                        exact_hosts.insert(domain, idx);
                    }
                }
            }
        }

        // Longest suffix first so the most specific wildcard wins
        wildcard_suffixes.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        Ok(Self {
            entities,
            exact_hosts,
            wildcard_suffixes,
        })
    }

    /// Get entity by name
    pub fn get_entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// Get all entities
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    fn entity_index(&self, host: &str) -> Option<usize> {
        if let Some(&idx) = self.exact_hosts.get(host) {
            return Some(idx);
        }

        self.wildcard_suffixes
            .iter()
            .find(|(suffix, _)| {
                host == suffix
                    || (host.len() > suffix.len()
                        && host.ends_with(suffix.as_str())
                        && host.as_bytes()[host.len() - suffix.len() - 1] == b'.')
            })
            .map(|&(_, idx)| idx)
    }
}

impl ResourceClassifier for EntityRegistry {
    fn entity_of(&self, url: &str) -> Option<&Entity> {
        let host = network_host(url)?;
        self.entity_index(&host).map(|idx| &self.entities[idx])
    }

    fn product_of(&self, url: &str) -> Option<&Product> {
        self.entity_of(url)?
            .products
            .iter()
            .find(|product| product.matches(url))
    }
}

/// Lowercased host of a network URL; `None` for `data:`, `blob:` and other
/// non-network schemes or unparseable input.
pub fn network_host(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    match parsed.scheme() {
        "http" | "https" | "ws" | "wss" => parsed.host_str().map(|h| h.to_ascii_lowercase()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const TEST_TOML: &str = r#"
[[entity]]
name = "Acme"
domains = ["*.acme.com", "acme-cdn.net"]

[[entity.product]]
name = "Acme Chat"
url_patterns = ["chat.acme.com/*"]

[[entity.product.facade]]
name = "Lite Chat"
repo = "https://example.com/lite-chat"

[[entity.product]]
name = "Acme Maps"
url_patterns = ["acme.com/maps/"]

[[entity]]
name = "Acme Ads"
domains = ["*.ads.acme.com"]
"#;

    #[test]
    fn test_from_toml_file() -> anyhow::Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, "{}", TEST_TOML)?;
        file.flush()?;

        let registry = EntityRegistry::from_toml(file.path())?;
        assert_eq!(registry.entities().len(), 2);
        assert!(registry.get_entity("Acme").is_some());
        Ok(())
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = EntityRegistry::from_toml("/nonexistent/entities.toml").unwrap_err();
        assert!(matches!(err, ClassifierError::Io { .. }));
    }

    #[test]
    fn test_entity_of_exact_and_wildcard() {
        let registry = EntityRegistry::from_toml_str(TEST_TOML).unwrap();

        let e = registry.entity_of("https://acme-cdn.net/lib.js").unwrap();
        assert_eq!(e.name, "Acme");

        let e = registry.entity_of("https://acme.com/").unwrap();
        assert_eq!(e.name, "Acme");

        assert!(registry.entity_of("https://notacme.com/").is_none());
    }

    #[test]
    fn test_longest_wildcard_wins() {
        let registry = EntityRegistry::from_toml_str(TEST_TOML).unwrap();

        let e = registry.entity_of("https://x.ads.acme.com/pixel").unwrap();
        assert_eq!(e.name, "Acme Ads");

        let e = registry.entity_of("https://www.acme.com/pixel").unwrap();
        assert_eq!(e.name, "Acme");
    }

    #[test]
    fn test_non_network_urls_have_no_entity() {
        let registry = EntityRegistry::from_toml_str(TEST_TOML).unwrap();
        assert!(registry.entity_of("data:image/png;base64,AAAA").is_none());
        assert!(registry.entity_of("blob:https://acme.com/1234").is_none());
        assert!(registry.entity_of("not a url").is_none());
    }

    #[test]
    fn test_product_of() {
        let registry = EntityRegistry::from_toml_str(TEST_TOML).unwrap();

        let p = registry.product_of("https://chat.acme.com/widget.js").unwrap();
        assert_eq!(p.name, "Acme Chat");
        assert_eq!(p.entity, "Acme");
        assert!(p.has_facade());

        let p = registry.product_of("https://www.acme.com/maps/embed").unwrap();
        assert_eq!(p.name, "Acme Maps");
        assert!(!p.has_facade());

        assert!(registry.product_of("https://static.acme.com/app.js").is_none());
    }

    #[test]
    fn test_is_first_party() {
        let registry = EntityRegistry::from_toml_str(TEST_TOML).unwrap();
        let main = registry.entity_of("https://www.acme.com/");

        assert!(registry.is_first_party("https://acme-cdn.net/a.js", main));
        assert!(!registry.is_first_party("https://x.ads.acme.com/a.js", main));
        assert!(!registry.is_first_party("https://acme-cdn.net/a.js", None));
    }

    #[test]
    fn test_duplicate_domain_error() {
        let toml = r#"
[[entity]]
name = "A"
domains = ["*.shared.com"]

[[entity]]
name = "B"
domains = ["*.shared.com"]
"#;
        let err = EntityRegistry::from_toml_str(toml).unwrap_err();
        assert!(err.to_string().contains("Duplicate domain"));
    }

    #[test]
    fn test_product_without_patterns_error() {
        let toml = r#"
[[entity]]
name = "A"
domains = ["a.com"]

[[entity.product]]
name = "Empty"
url_patterns = []
"#;
        let err = EntityRegistry::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, ClassifierError::EmptyProduct { .. }));
    }

    #[test]
    fn test_default_database_loads() {
        let registry = EntityRegistry::default_database().unwrap();
        let youtube = registry.get_entity("YouTube").unwrap();
        assert!(youtube.products.iter().any(|p| p.has_facade()));
    }
}
