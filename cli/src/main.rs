//! Demonstration CLI for the crypto-conditions workspace. Thin: every real
//! decision lives in the library crates; this binary only wires `clap`
//! argument parsing to `paris` status output and `eyre` error propagation.

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use paris::Logger;

use cc_core::{describe_bitmask, Condition};
use cc_fulfillment::{Preimage, SelectionLimits, Threshold};
use crypto_conditions::{parse_uri, verify, Fulfillment, Parsed};

#[derive(Parser)]
#[command(name = "cc-cli", about = "Parse, build, and validate crypto-conditions")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a `cc:` or `cf:` URI and print what it describes.
    Parse { uri: String },
    /// Parse a `cf:` fulfillment URI and validate it against a message.
    Validate {
        uri: String,
        #[arg(long)]
        message: Option<String>,
    },
    /// Check a fulfillment URI against an expected `cc:` condition URI,
    /// refusing to parse it at all if it exceeds the condition's
    /// advertised size bound.
    Verify {
        fulfillment_uri: String,
        condition_uri: String,
        #[arg(long)]
        message: Option<String>,
    },
    /// Build a small nested threshold fulfillment and report its cost.
    ThresholdDemo {
        #[arg(long, default_value_t = SelectionLimits::default().max_subentries)]
        max_subentries: usize,
        #[arg(long, default_value_t = SelectionLimits::default().parallel_threshold)]
        parallel_threshold: usize,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let mut log = Logger::new();

    match cli.command {
        Command::Parse { uri } => run_parse(&mut log, &uri)?,
        Command::Validate { uri, message } => run_validate(&mut log, &uri, message.as_deref())?,
        Command::Verify {
            fulfillment_uri,
            condition_uri,
            message,
        } => run_verify(&mut log, &fulfillment_uri, &condition_uri, message.as_deref())?,
        Command::ThresholdDemo {
            max_subentries,
            parallel_threshold,
        } => run_threshold_demo(&mut log, max_subentries, parallel_threshold)?,
    }

    Ok(())
}

fn run_parse(log: &mut Logger, uri: &str) -> Result<()> {
    match parse_uri(uri)? {
        Parsed::Condition(c) => {
            log.info(format!(
                "condition: type_bitmask=0x{:x} ({}), max_fulfillment_length={}",
                c.type_bitmask(),
                describe_bitmask(c.type_bitmask() as u32),
                c.max_fulfillment_length()
            ));
        }
        Parsed::Fulfillment(f) => {
            let condition = f.condition()?;
            log.info(format!(
                "fulfillment: type_bit={}, derives condition {}",
                f.type_bit(),
                condition.to_uri()
            ));
        }
    }
    Ok(())
}

fn run_validate(log: &mut Logger, uri: &str, message: Option<&str>) -> Result<()> {
    let fulfillment = Fulfillment::from_uri(uri)?;
    let ok = fulfillment.validate(message.map(str::as_bytes));
    if ok {
        log.success(format!("{uri} validates"));
    } else {
        log.error(format!("{uri} does not validate"));
    }
    Ok(())
}

fn run_verify(log: &mut Logger, fulfillment_uri: &str, condition_uri: &str, message: Option<&str>) -> Result<()> {
    let condition = Condition::from_uri(condition_uri)?;
    let ok = verify(fulfillment_uri, &condition, message.map(str::as_bytes))?;
    if ok {
        log.success(format!("{fulfillment_uri} verifies against {condition_uri}"));
    } else {
        log.error(format!("{fulfillment_uri} does not verify against {condition_uri}"));
    }
    Ok(())
}

fn run_threshold_demo(log: &mut Logger, max_subentries: usize, parallel_threshold: usize) -> Result<()> {
    let limits = SelectionLimits {
        max_subentries,
        parallel_threshold,
    };
    let threshold = Threshold::with_limits(2, limits)
        .add_fulfillment(Fulfillment::Preimage(Preimage::new(b"first".to_vec())), 1, Vec::new())
        .add_fulfillment(Fulfillment::Preimage(Preimage::new(b"second".to_vec())), 1, Vec::new())
        .add_fulfillment(
            Fulfillment::Preimage(Preimage::new(b"third-and-longer".to_vec())),
            1,
            Vec::new(),
        );
    let f = Fulfillment::Threshold(threshold);
    let condition = f.condition()?;
    let binary = f.to_binary()?;
    log.success(format!(
        "built threshold fulfillment: {} bytes, condition {}",
        binary.len(),
        condition.to_uri()
    ));
    Ok(())
}
