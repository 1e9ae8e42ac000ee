use std::sync::Arc;

use crate::config::Config;
use crate::params::{BidParams, MessageParams, MissionParams, NeedParams, Params};
use crate::topic::TopicId;

/// Typed entity uniting a topic id, its params and the process config.
///
/// Construction is pure: no log or registrar access. Two records are equal
/// when topic and params are equal; the config is not compared.
pub trait DomainRecord: Send + 'static {
    type Params: Params;

    fn new(topic: TopicId, params: Self::Params, config: Arc<Config>) -> Self;

    fn topic(&self) -> &TopicId;

    fn params(&self) -> &Self::Params;

    fn config(&self) -> &Arc<Config>;
}

macro_rules! domain_record {
    ($(#[$meta:meta])* $name:ident, $params:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            topic: TopicId,
            params: $params,
            config: Arc<Config>,
        }

        impl DomainRecord for $name {
            type Params = $params;

            fn new(topic: TopicId, params: $params, config: Arc<Config>) -> Self {
                Self { topic, params, config }
            }

            fn topic(&self) -> &TopicId {
                &self.topic
            }

            fn params(&self) -> &$params {
                &self.params
            }

            fn config(&self) -> &Arc<Config> {
                &self.config
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.topic == other.topic && self.params == other.params
            }
        }
    };
}

domain_record!(
    /// A service request published by a consumer.
    Need,
    NeedParams
);
domain_record!(
    /// A provider's offer to fulfil a need.
    Bid,
    BidParams
);
domain_record!(
    /// An accepted bid being carried out.
    Mission,
    MissionParams
);
domain_record!(
    /// A message exchanged on a mission or need topic.
    Message,
    MessageParams
);

impl Need {
    /// Lifetime in seconds: the need's own ttl or the configured default.
    pub fn ttl(&self) -> u64 {
        self.params.ttl.unwrap_or(self.config.need_ttl)
    }
}

impl Bid {
    pub fn ttl(&self) -> u64 {
        self.params.ttl.unwrap_or(self.config.bid_ttl)
    }
}

impl Mission {
    pub fn ttl(&self) -> u64 {
        self.config.mission_ttl
    }
}

impl Message {
    pub fn ttl(&self) -> u64 {
        self.config.message_ttl
    }
}
