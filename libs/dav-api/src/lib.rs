pub mod config;
pub mod error;
pub mod log;
pub mod params;
pub mod record;
pub mod registrar;
pub mod topic;

pub use config::{Config, ConfigError};
pub use error::{LogError, LogErrorKind, RegistrarError};
pub use log::{MessageLog, MessageLogExt, ParamsSubscription, RawSubscription};
pub use params::{
    Area, BidParams, Location, MessageParams, MissionParams, NeedFilterParams, NeedParams, Params,
};
pub use record::{Bid, DomainRecord, Message, Mission, Need};
pub use registrar::Registrar;
pub use topic::{RecordKind, TopicId, TopicSpec};
