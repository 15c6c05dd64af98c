use crate::config::ConfigError;
use crate::dom::ParseError;
use crate::engine::{HistoryError, LoadError};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error("Parser error: {0}")]
    Parse(#[from] ParseError),

    #[error("Network error: {0}")]
    Net(#[from] reqwest::Error),

    #[error(transparent)]
    Render(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_component_errors() {
        let e: EngineError = HistoryError::AtFirstPage.into();
        assert_eq!(e.to_string(), "can't go back; already on last page");

        let e: EngineError = ConfigError::ZeroChannelCapacity.into();
        assert_eq!(e.to_string(), "Configuration error: channel_capacity must be at least 1");

        let e: EngineError = LoadError::Status(500).into();
        assert_eq!(e.to_string(), "Load error: non-200 status code: 500");

        let e: EngineError = anyhow::anyhow!("surface lost").into();
        assert_eq!(e.to_string(), "surface lost");
    }
}
