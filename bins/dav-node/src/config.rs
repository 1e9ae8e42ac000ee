use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "dav-node", about = "Publish and watch needs, bids, missions and messages")]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(long, global = true, default_value = "dav.toml", env = "DAV_CONFIG")]
    pub config: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register a need on a freshly provisioned topic
    PublishNeed(PublishNeedArgs),
    /// Subscribe to a topic and log every record; JSON params read from
    /// stdin are sent to the same topic
    Watch(WatchArgs),
}

#[derive(Args, Clone, Debug)]
pub struct PublishNeedArgs {
    #[arg(long)]
    pub need_type: String,
    #[arg(long, requires = "long")]
    pub lat: Option<f64>,
    #[arg(long, requires = "lat")]
    pub long: Option<f64>,
    /// Seconds; defaults to `need_ttl` from the config
    #[arg(long)]
    pub ttl: Option<u64>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum WatchKind {
    Need,
    Bid,
    Mission,
    Message,
}

#[derive(Args, Clone, Debug)]
pub struct WatchArgs {
    #[arg(long, value_enum, default_value = "message")]
    pub kind: WatchKind,
    /// Existing topic; a new one is provisioned when omitted
    #[arg(long)]
    pub topic: Option<String>,
    /// Need type registered with the registrar (kind = need)
    #[arg(long, default_value = "any")]
    pub need_type: String,
}
