#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error("config: {0}")]
    Config(#[from] dav_api::ConfigError),

    #[error("{0}")]
    Coordinator(#[from] dav_engine::CoordinatorError),

    #[error("stream: {0}")]
    Stream(#[from] dav_api::LogError),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
