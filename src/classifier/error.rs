use thiserror::Error;

/// Errors raised while loading a classification database
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Failed to read entity database {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse entity database: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Duplicate entity '{0}'")]
    DuplicateEntity(String),

    #[error("Duplicate domain '{domain}' in entities '{first}' and '{second}'")]
    DuplicateDomain {
        domain: String,
        first: String,
        second: String,
    },

    #[error("Product '{product}' of entity '{entity}' has no url_patterns")]
    EmptyProduct { entity: String, product: String },
}
