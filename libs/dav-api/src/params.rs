use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::topic::RecordKind;

/// Raw, type-specific payload of a record before it is bound to a topic.
///
/// Travels as JSON both to the registrar and over the message log.
pub trait Params:
    Serialize + DeserializeOwned + Clone + PartialEq + Debug + Send + Sync + 'static
{
    const KIND: RecordKind;
}

/// WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub long: f64,
}

/// Circular area used to filter needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub lat: f64,
    pub long: f64,
    /// Meters.
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeedParams {
    pub need_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    /// Seconds; falls back to `Config::need_ttl`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
}

impl Params for NeedParams {
    const KIND: RecordKind = RecordKind::Need;
}

/// Body of a `needsForType` registration: which needs a provider wants to see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeedFilterParams {
    pub need_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<Area>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BidParams {
    pub need_id: String,
    pub price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eta_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
}

impl Params for BidParams {
    const KIND: RecordKind = RecordKind::Bid;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionParams {
    pub need_id: String,
    pub bid_id: String,
    pub vehicle_id: String,
    pub price: String,
}

impl Params for MissionParams {
    const KIND: RecordKind = RecordKind::Mission;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageParams {
    pub message_type: String,
    #[serde(default)]
    pub body: serde_json::Value,
}

impl Params for MessageParams {
    const KIND: RecordKind = RecordKind::Message;
}
