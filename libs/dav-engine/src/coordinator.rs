use std::sync::Arc;

use dav_api::{
    Bid, BidParams, Config, DomainRecord, Message, MessageLog, MessageLogExt, MessageParams,
    Mission, MissionParams, Need, NeedFilterParams, NeedParams, Params, Registrar, TopicId,
    TopicSpec,
};

use crate::error::{CoordinatorError, Operation};
use crate::hydrator::StreamHydrator;
use crate::publisher::Publisher;
use crate::resolver::TopicResolver;
use crate::stream::RecordStream;

/// Public entry point: resolves topics, then registers or subscribes.
///
/// Every operation runs its steps strictly in sequence. A provisioning
/// failure ends the operation before the registrar or the log subscription
/// is touched. Once a stream is handed out, its failures arrive on the
/// stream itself.
#[derive(Clone)]
pub struct Coordinator {
    config: Arc<Config>,
    log: Arc<dyn MessageLog>,
    resolver: TopicResolver,
    publisher: Publisher,
    hydrator: StreamHydrator,
}

impl Coordinator {
    pub fn new(
        config: Arc<Config>,
        log: Arc<dyn MessageLog>,
        registrar: Arc<dyn Registrar>,
    ) -> Result<Self, CoordinatorError> {
        config.validate()?;
        Ok(Self {
            resolver: TopicResolver::new(log.clone(), config.clone()),
            publisher: Publisher::new(registrar, config.clone())?,
            hydrator: StreamHydrator::new(log.clone(), config.clone()),
            log,
            config,
        })
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    // ═══════════════════════════════════════════════════════════════
    //  One-shot registration
    // ═══════════════════════════════════════════════════════════════

    /// Provision a need topic and register the need on it.
    pub async fn publish_need(&self, params: NeedParams) -> Result<Need, CoordinatorError> {
        self.publish(Operation::PublishNeed, params).await
    }

    /// Provision a bid topic and register the bid on it.
    pub async fn publish_bid(&self, params: BidParams) -> Result<Bid, CoordinatorError> {
        self.publish(Operation::PublishBid, params).await
    }

    async fn publish<R: DomainRecord>(
        &self,
        operation: Operation,
        params: R::Params,
    ) -> Result<R, CoordinatorError> {
        let kind = <R::Params as Params>::KIND;
        let topic = self.resolver.resolve(TopicSpec::Generated(kind)).await?;
        self.publisher.publish(operation, topic, params).await
    }

    // ═══════════════════════════════════════════════════════════════
    //  Streaming registration
    // ═══════════════════════════════════════════════════════════════

    /// Register interest in needs matching `filter` and stream them.
    ///
    /// The filter is posted to the registrar only after the topic is ready;
    /// the subscription opens only after the registrar accepted it.
    pub async fn needs_for_type(
        &self,
        filter: NeedFilterParams,
        topic: Option<TopicId>,
    ) -> Result<RecordStream<Need>, CoordinatorError> {
        let topic = self.resolve::<Need>(topic).await?;
        self.publisher
            .register_filter(Operation::NeedsForType, &topic, &filter)
            .await?;
        Ok(self.hydrator.hydrate(topic))
    }

    pub async fn bids(
        &self,
        topic: Option<TopicId>,
    ) -> Result<RecordStream<Bid>, CoordinatorError> {
        self.stream(topic).await
    }

    pub async fn missions(
        &self,
        topic: Option<TopicId>,
    ) -> Result<RecordStream<Mission>, CoordinatorError> {
        self.stream(topic).await
    }

    pub async fn messages(
        &self,
        topic: Option<TopicId>,
    ) -> Result<RecordStream<Message>, CoordinatorError> {
        self.stream(topic).await
    }

    async fn stream<R: DomainRecord>(
        &self,
        topic: Option<TopicId>,
    ) -> Result<RecordStream<R>, CoordinatorError> {
        let topic = self.resolve::<R>(topic).await?;
        Ok(self.hydrator.hydrate(topic))
    }

    async fn resolve<R: DomainRecord>(
        &self,
        topic: Option<TopicId>,
    ) -> Result<TopicId, CoordinatorError> {
        let spec = TopicSpec::or_generate(topic, <R::Params as Params>::KIND);
        self.resolver.resolve(spec).await
    }

    /// Append a message to an existing topic.
    pub async fn send_message(
        &self,
        topic: &TopicId,
        params: &MessageParams,
    ) -> Result<(), CoordinatorError> {
        self.log.send(topic, params).await.map_err(CoordinatorError::Send)
    }

    // ═══════════════════════════════════════════════════════════════
    //  Local construction, no log or registrar access
    // ═══════════════════════════════════════════════════════════════

    pub fn need(&self, topic: TopicId, params: NeedParams) -> Need {
        Need::new(topic, params, self.config.clone())
    }

    pub fn bid(&self, id: TopicId, params: BidParams) -> Bid {
        Bid::new(id, params, self.config.clone())
    }

    pub fn mission(&self, id: TopicId, params: MissionParams) -> Mission {
        Mission::new(id, params, self.config.clone())
    }

    pub fn message(&self, topic: TopicId, params: MessageParams) -> Message {
        Message::new(topic, params, self.config.clone())
    }
}
