use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use ua_types::{AttributeId, NodeId, TimestampsToReturn, Variant};

#[derive(Parser)]
#[command(
    name = "uasx",
    about = "Run address-space services against a demonstration node graph",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Service configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// List every node in the address space
    Nodes,
    /// Show the references of a node
    Browse(BrowseArgs),
    /// Read attributes of one or more nodes
    Read(ReadArgs),
    /// Write the value of a variable
    Write(WriteArgs),
    /// Read stored samples of a historizing variable
    History(HistoryArgs),
    /// Call a method on an object
    Call(CallArgs),
}

#[derive(Args)]
pub struct BrowseArgs {
    /// Node id, e.g. `ns=1;i=1000`
    pub node: NodeId,
    /// Skip the existence check (GetReferences)
    #[arg(long)]
    pub unchecked: bool,
}

#[derive(Args)]
pub struct ReadArgs {
    #[arg(required = true)]
    pub nodes: Vec<NodeId>,
    #[arg(short, long, default_value = "value")]
    pub attribute: AttributeArg,
    #[arg(long, default_value = "both")]
    pub timestamps: TimestampsArg,
    /// Index range, e.g. `2` or `1:3`
    #[arg(long)]
    pub range: Option<String>,
}

#[derive(Args)]
pub struct WriteArgs {
    pub node: NodeId,
    pub value: String,
    #[arg(short = 't', long = "type", default_value = "double")]
    pub value_type: ValueType,
}

#[derive(Args)]
pub struct HistoryArgs {
    pub node: NodeId,
    /// Window start, milliseconds before now
    #[arg(long, default_value = "60000")]
    pub since_ms: i64,
    /// Only the most recent sample
    #[arg(long)]
    pub latest: bool,
    /// Maximum samples to return; 0 for no limit
    #[arg(short = 'n', long, default_value = "0")]
    pub limit: u32,
    #[arg(long, default_value = "both")]
    pub timestamps: TimestampsArg,
}

#[derive(Args)]
pub struct CallArgs {
    pub object: NodeId,
    pub method: NodeId,
    /// Input arguments
    pub args: Vec<String>,
    #[arg(short = 't', long = "type", default_value = "double")]
    pub arg_type: ValueType,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum AttributeArg {
    NodeId,
    NodeClass,
    BrowseName,
    DisplayName,
    Description,
    IsAbstract,
    Value,
    DataType,
    AccessLevel,
    Historizing,
    Executable,
}

impl From<AttributeArg> for AttributeId {
    fn from(arg: AttributeArg) -> Self {
        match arg {
            AttributeArg::NodeId => AttributeId::NodeId,
            AttributeArg::NodeClass => AttributeId::NodeClass,
            AttributeArg::BrowseName => AttributeId::BrowseName,
            AttributeArg::DisplayName => AttributeId::DisplayName,
            AttributeArg::Description => AttributeId::Description,
            AttributeArg::IsAbstract => AttributeId::IsAbstract,
            AttributeArg::Value => AttributeId::Value,
            AttributeArg::DataType => AttributeId::DataType,
            AttributeArg::AccessLevel => AttributeId::AccessLevel,
            AttributeArg::Historizing => AttributeId::Historizing,
            AttributeArg::Executable => AttributeId::Executable,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum TimestampsArg {
    Source,
    Server,
    Both,
    Neither,
}

impl From<TimestampsArg> for TimestampsToReturn {
    fn from(arg: TimestampsArg) -> Self {
        match arg {
            TimestampsArg::Source => TimestampsToReturn::Source,
            TimestampsArg::Server => TimestampsToReturn::Server,
            TimestampsArg::Both => TimestampsToReturn::Both,
            TimestampsArg::Neither => TimestampsToReturn::Neither,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ValueType {
    Double,
    Int32,
    Boolean,
    String,
}

impl ValueType {
    pub fn parse(&self, text: &str) -> anyhow::Result<Variant> {
        Ok(match self {
            Self::Double => Variant::Double(text.parse()?),
            Self::Int32 => Variant::Int32(text.parse()?),
            Self::Boolean => Variant::Boolean(text.parse()?),
            Self::String => Variant::String(text.to_string()),
        })
    }
}
