pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read record source {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed tabular data in {location}: {source}")]
    Tabular {
        location: String,
        #[source]
        source: csv::Error,
    },

    #[error("invalid chart config JSON: {0}")]
    Config(#[from] serde_json::Error),
}
