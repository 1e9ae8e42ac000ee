#![allow(dead_code)]

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use dav_api::{
    Config, LogError, MessageLog, Params, RawSubscription, RecordKind, Registrar, RegistrarError,
    TopicId,
};
use dav_engine::Coordinator;

pub const SEED: &str = "http://seed:8080";
pub const GENERATED: &str = "TOPIC_ID";

/// Collaborator call, in the order it happened.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Generate(RecordKind),
    Create(TopicId),
    Subscribe(TopicId),
    Send(TopicId),
    Post(String, serde_json::Value),
}

#[derive(Debug, Default)]
pub struct Journal(Mutex<Vec<Call>>);

impl Journal {
    pub fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }
}

/// Message log that records every call and replays a fixed list of items
/// to each subscription.
#[derive(Default)]
pub struct FakeLog {
    pub journal: Arc<Journal>,
    pub create_error: Option<LogError>,
    pub open_error: Option<LogError>,
    pub send_error: Option<LogError>,
    pub queued: Vec<Result<serde_json::Value, LogError>>,
}

impl FakeLog {
    pub fn queue<P: Params>(&mut self, params: &P) {
        self.queued.push(Ok(serde_json::to_value(params).unwrap()));
    }
}

impl MessageLog for FakeLog {
    fn generate_topic_id(&self, kind: RecordKind) -> TopicId {
        self.journal.push(Call::Generate(kind));
        TopicId::new(GENERATED)
    }

    fn create_topic(
        &self,
        topic: &TopicId,
        _config: &Config,
    ) -> Pin<Box<dyn Future<Output = Result<(), LogError>> + Send + '_>> {
        self.journal.push(Call::Create(topic.clone()));
        let result = match &self.create_error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        };
        Box::pin(async move { result })
    }

    fn subscribe_raw(
        &self,
        topic: &TopicId,
        _config: &Config,
    ) -> Pin<Box<dyn Future<Output = Result<RawSubscription, LogError>> + Send + '_>> {
        self.journal.push(Call::Subscribe(topic.clone()));
        let result = match &self.open_error {
            Some(e) => Err(e.clone()),
            None => {
                let items = self.queued.clone();
                Ok(Box::pin(futures_util::stream::iter(items)) as RawSubscription)
            }
        };
        Box::pin(async move { result })
    }

    fn send_raw(
        &self,
        topic: &TopicId,
        _value: serde_json::Value,
    ) -> Pin<Box<dyn Future<Output = Result<(), LogError>> + Send + '_>> {
        self.journal.push(Call::Send(topic.clone()));
        let result = match &self.send_error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        };
        Box::pin(async move { result })
    }
}

/// Registrar that records posts into the shared journal.
#[derive(Default)]
pub struct FakeRegistrar {
    pub journal: Arc<Journal>,
    pub error: Option<RegistrarError>,
}

impl Registrar for FakeRegistrar {
    fn post(
        &self,
        url: &str,
        body: serde_json::Value,
    ) -> Pin<Box<dyn Future<Output = Result<(), RegistrarError>> + Send + '_>> {
        self.journal.push(Call::Post(url.to_string(), body));
        let result = match &self.error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        };
        Box::pin(async move { result })
    }
}

pub fn config() -> Arc<Config> {
    Arc::new(Config::new(SEED))
}

/// Wire a coordinator over the fakes, sharing one journal.
pub fn coordinator(
    mut log: FakeLog,
    mut registrar: FakeRegistrar,
) -> (Coordinator, Arc<Journal>, Arc<Config>) {
    let journal = Arc::new(Journal::default());
    log.journal = journal.clone();
    registrar.journal = journal.clone();
    let config = config();
    let coordinator =
        Coordinator::new(config.clone(), Arc::new(log), Arc::new(registrar)).unwrap();
    (coordinator, journal, config)
}
