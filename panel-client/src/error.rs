use thiserror::Error;

#[derive(Error, Debug)]
pub enum PanelError {
    #[error("Login failed: {0}")]
    Auth(String),

    #[error("Panel API error: {0}")]
    Api(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unsupported panel type: {0}")]
    UnsupportedType(String),
}
