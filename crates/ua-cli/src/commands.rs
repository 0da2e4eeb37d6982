use anyhow::{bail, Context};
use colored::{ColoredString, Colorize};
use tracing::debug;
use ua_nodes::NodeManager;
use ua_server::{AddressSpace, ManagedAddressSpace, ServiceConfig, ServiceContext};
use ua_types::{
    CallMethodRequest, DataValue, DateTime, HistoryReadDetails, HistoryReadValueId, NumericRange,
    ReadRawModifiedDetails, ReadValueId, StatusCode, TimestampsToReturn, ViewDescription,
    WriteValue,
};

use crate::cli::*;
use crate::demo;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => ServiceConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => ServiceConfig::default(),
    };
    debug!(?config, "service configuration");
    let space = demo::build(config)?;
    let format = cli.format;

    match cli.command {
        Command::Nodes => cmd_nodes(&space, format),
        Command::Browse(args) => cmd_browse(&space, args, format).await,
        Command::Read(args) => cmd_read(&space, args, format).await,
        Command::Write(args) => cmd_write(&space, args, format).await,
        Command::History(args) => cmd_history(&space, args, format).await,
        Command::Call(args) => cmd_call(&space, args, format).await,
    }
}

fn status_label(status: StatusCode) -> ColoredString {
    let text = status.to_string();
    if status.is_good() {
        text.green()
    } else if status.is_uncertain() {
        text.yellow()
    } else {
        text.red()
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn describe(value: &DataValue) -> String {
    let mut line = format!("{} [{}]", value.value, status_label(value.status));
    if let Some(t) = value.source_timestamp {
        line.push_str(&format!(" source={t}"));
    }
    if let Some(t) = value.server_timestamp {
        line.push_str(&format!(" server={t}"));
    }
    line
}

fn cmd_nodes(space: &ManagedAddressSpace, format: OutputFormat) -> anyhow::Result<()> {
    let nodes = space.node_manager();
    let ids = nodes.node_ids();
    if let OutputFormat::Json = format {
        return print_json(&ids);
    }
    for id in ids {
        if let Some(node) = nodes.get_node(&id) {
            println!(
                "{:<18} {:<14} {}",
                id.to_string().yellow(),
                node.node_class().to_string().cyan(),
                node.browse_name()
            );
        }
    }
    Ok(())
}

async fn cmd_browse(
    space: &ManagedAddressSpace,
    args: BrowseArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let (ctx, done) = ServiceContext::internal();
    let view = ViewDescription::default();
    if args.unchecked {
        space.get_references(ctx, &view, &args.node).await;
    } else {
        space.browse(ctx, &view, &args.node).await;
    }
    let references = match done.await {
        Ok(references) => references,
        Err(status) => bail!("browse of {} failed: {status}", args.node),
    };

    if let OutputFormat::Json = format {
        return print_json(&references);
    }
    if references.is_empty() {
        println!("No references.");
    }
    for r in &references {
        let arrow = if r.is_forward { "->" } else { "<-" };
        println!(
            "  {} {} {}",
            r.reference_type_id.to_string().dimmed(),
            arrow,
            r.target_id.to_string().yellow()
        );
    }
    Ok(())
}

async fn cmd_read(
    space: &ManagedAddressSpace,
    args: ReadArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let range = args
        .range
        .as_deref()
        .map(str::parse::<NumericRange>)
        .transpose()?;
    let items: Vec<ReadValueId> = args
        .nodes
        .iter()
        .map(|node| {
            let mut item = ReadValueId::new(node.clone(), args.attribute.into());
            item.index_range = range;
            item
        })
        .collect();

    let (ctx, done) = ServiceContext::internal();
    space.read(ctx, 0.0, args.timestamps.into(), &items).await;
    let values = done.await.map_err(|s| anyhow::anyhow!("read failed: {s}"))?;

    if let OutputFormat::Json = format {
        return print_json(&values);
    }
    for (item, value) in items.iter().zip(&values) {
        println!(
            "{} {} = {}",
            item.node_id.to_string().yellow(),
            item.attribute_id,
            describe(value)
        );
    }
    Ok(())
}

async fn cmd_write(
    space: &ManagedAddressSpace,
    args: WriteArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let value = args.value_type.parse(&args.value)?;
    let items = vec![WriteValue::value(args.node.clone(), value)];

    let (ctx, done) = ServiceContext::internal();
    space.write(ctx, &items).await;
    let results = done.await.map_err(|s| anyhow::anyhow!("write failed: {s}"))?;

    if let OutputFormat::Json = format {
        return print_json(&results);
    }
    for status in results {
        println!("{} {}", args.node.to_string().yellow(), status_label(status));
    }
    Ok(())
}

async fn cmd_history(
    space: &ManagedAddressSpace,
    args: HistoryArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let mut details = if args.latest {
        ReadRawModifiedDetails::latest()
    } else {
        let now = DateTime::now();
        // Open the window a moment past now so the newest sample is inside it.
        let start = now.plus_millis(args.since_ms.saturating_neg());
        ReadRawModifiedDetails::window(start, now.plus_millis(1))
    };
    details.num_values_per_node = args.limit;
    let timestamps: TimestampsToReturn = args.timestamps.into();

    let (ctx, done) = ServiceContext::internal();
    space
        .history_read(
            ctx,
            &HistoryReadDetails::RawModified(details),
            timestamps,
            &[HistoryReadValueId::new(args.node.clone())],
        )
        .await;
    let results = done.await.map_err(|s| anyhow::anyhow!("history read failed: {s}"))?;

    if let OutputFormat::Json = format {
        return print_json(&results);
    }
    for result in &results {
        println!(
            "{} {} ({} samples)",
            args.node.to_string().yellow(),
            status_label(result.status),
            result.data_values().len()
        );
        for sample in result.data_values() {
            println!("  {}", describe(sample));
        }
    }
    Ok(())
}

async fn cmd_call(
    space: &ManagedAddressSpace,
    args: CallArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let inputs = args
        .args
        .iter()
        .map(|a| args.arg_type.parse(a))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let requests = vec![CallMethodRequest::new(args.object.clone(), args.method.clone(), inputs)];

    let (ctx, done) = ServiceContext::internal();
    space.call(ctx, &requests).await;
    let results = done.await.map_err(|s| anyhow::anyhow!("call failed: {s}"))?;

    if let OutputFormat::Json = format {
        return print_json(&results);
    }
    for result in &results {
        println!("{} {}", args.method.to_string().yellow(), status_label(result.status));
        for (i, status) in result.input_argument_results.iter().enumerate() {
            if status.is_bad() {
                println!("  input {i}: {}", status_label(*status));
            }
        }
        for output in &result.output_arguments {
            println!("  => {output}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn cli(args: &[&str]) -> Cli {
        use clap::Parser;
        Cli::try_parse_from(std::iter::once("uasx").chain(args.iter().copied())).unwrap()
    }

    #[tokio::test]
    async fn every_command_runs_against_demo() {
        for args in [
            vec!["nodes"],
            vec!["browse", "ns=1;i=1000"],
            vec!["browse", "--unchecked", "ns=1;i=9999"],
            vec!["read", "ns=1;i=1001", "ns=1;i=1002"],
            vec!["write", "ns=1;i=1002", "68.5"],
            vec!["history", "ns=1;i=1001", "-n", "5"],
            vec!["history", "ns=1;i=1001", "--latest"],
            vec!["history", "ns=1;i=1001", "--since-ms", "9223372036854775807"],
            vec!["call", "ns=1;i=1000", "ns=1;i=1003", "0.5"],
            vec!["--format", "json", "read", "ns=1;i=1001"],
        ] {
            run_command(cli(&args)).await.unwrap();
        }
    }

    #[tokio::test]
    async fn browse_unknown_node_is_an_error() {
        let err = run_command(cli(&["browse", "ns=1;i=9999"])).await.unwrap_err();
        assert!(err.to_string().contains("Bad_NodeIdUnknown"));
    }

    #[tokio::test]
    async fn config_file_is_applied() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_concurrent_items = 1").unwrap();
        let path = file.path().to_str().unwrap().to_string();
        run_command(cli(&["--config", &path, "nodes"])).await.unwrap();

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        writeln!(bad, "bogus = true").unwrap();
        let path = bad.path().to_str().unwrap().to_string();
        assert!(run_command(cli(&["--config", &path, "nodes"])).await.is_err());
    }
}
