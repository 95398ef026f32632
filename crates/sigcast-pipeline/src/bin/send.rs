//! sigcast-send: encode one signal frame and offer it to the
//! configured channels. Handy for exercising consumers end to end
//! without the host trading platform.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Parser;
use sigcast_core::{Signal, StrategyAction, TickOffsets};
use sigcast_pipeline::PipelineConfig;
use sigcast_transport::Publisher;
use tracing::info;

#[derive(Parser, Debug)]
#[command(version, about = "Publish a single trading-signal frame")]
struct Args {
    /// Configuration file path (also via SIGCAST_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,

    /// Action name (e.g. long-entry1, short-exit, profit-target) or
    /// numeric wire code 1-9
    #[arg(short, long)]
    action: String,

    /// Master symbol (e.g. ES)
    #[arg(short, long)]
    symbol: String,

    /// Full instrument name; defaults to the symbol
    #[arg(short, long)]
    instrument: Option<String>,

    /// Confidence metric, 0-100
    #[arg(long, default_value_t = 50.0)]
    confidence: f32,
}

fn parse_action(input: &str) -> Result<StrategyAction> {
    if let Ok(code) = input.parse::<u16>() {
        return StrategyAction::from_code(code).context("Unknown action code");
    }
    let normalized: String = input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    let action = match normalized.as_str() {
        "longentry1" => StrategyAction::LongEntry1,
        "longentry2" => StrategyAction::LongEntry2,
        "shortentry1" => StrategyAction::ShortEntry1,
        "shortentry2" => StrategyAction::ShortEntry2,
        "longexit" => StrategyAction::LongExit,
        "shortexit" => StrategyAction::ShortExit,
        "longstoploss" => StrategyAction::LongStopLoss,
        "shortstoploss" => StrategyAction::ShortStopLoss,
        "profittarget" => StrategyAction::ProfitTarget,
        other => bail!("Unknown action: {other}"),
    };
    Ok(action)
}

fn main() -> Result<()> {
    let args = Args::parse();

    sigcast_pipeline::init_logging();

    let config = match &args.config {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::load()?,
    };

    let action = parse_action(&args.action)?;
    let ticks = TickOffsets::for_action(action, config.stop_loss_ticks, config.profit_offset_ticks);
    let instrument = args.instrument.clone().unwrap_or_else(|| args.symbol.clone());

    let signal = Signal::new(
        args.symbol,
        instrument,
        action,
        ticks,
        config.qty,
        args.confidence,
        config.source_tag.clone(),
        Utc::now(),
    );

    let mut publisher = Publisher::from_config(&config.publish)?;
    if publisher.channel_count() == 0 {
        bail!("No channels available; check the publish config");
    }

    publisher.publish(&signal);
    for (name, stats) in publisher.stats() {
        info!(channel = name, sent = stats.sent(), dropped = stats.dropped(), "Offer complete");
    }
    publisher.shutdown();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_action_by_name() {
        assert_eq!(
            parse_action("long-entry1").unwrap(),
            StrategyAction::LongEntry1
        );
        assert_eq!(
            parse_action("ShortExit").unwrap(),
            StrategyAction::ShortExit
        );
    }

    #[test]
    fn test_parse_action_by_code() {
        assert_eq!(parse_action("9").unwrap(), StrategyAction::ProfitTarget);
        assert!(parse_action("10").is_err());
        assert!(parse_action("sideways").is_err());
    }
}
