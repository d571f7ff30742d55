use thiserror::Error;

#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("Failed to read test data file {0}")]
    ReadFailed(String, #[source] std::io::Error),
    #[error("Test data does not match the expected shape: {0}")]
    InvalidTestData(#[from] serde_json::Error),
    #[error("Failed to load environment file: {0}")]
    EnvFileFailed(#[from] dotenvy::Error),
}
