pub mod coordinator;
pub mod error;
pub mod http;
mod hydrator;
pub mod memory_log;
pub mod publisher;
pub mod resolver;
pub mod stream;

pub use coordinator::Coordinator;
pub use error::{CoordinatorError, Operation};
pub use http::HttpRegistrar;
pub use memory_log::MemoryLog;
pub use publisher::Publisher;
pub use resolver::TopicResolver;
pub use stream::RecordStream;
