use dav_api::{DomainRecord, Location, NeedParams};

use crate::config::PublishNeedArgs;
use crate::error::NodeError;

pub async fn run(config_path: &str, args: PublishNeedArgs) -> Result<(), NodeError> {
    let (coordinator, _log) = super::bootstrap(config_path)?;

    let location = match (args.lat, args.long) {
        (Some(lat), Some(long)) => Some(Location { lat, long }),
        _ => None,
    };
    let params = NeedParams { need_type: args.need_type, location, ttl: args.ttl };

    let need = coordinator.publish_need(params).await?;
    tracing::info!(topic = %need.topic(), ttl = need.ttl(), "need published");
    Ok(())
}
