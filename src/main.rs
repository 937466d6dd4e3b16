//! Transaction Anomaly Explorer - Main Entry Point
//!
//! Prompts for a contamination rate, refits the isolation forest over the
//! cached dataset and renders the result. Runs until `q` or end of input.

use anyhow::{Context, Result};
use fraud_anomaly_explorer::{
    config::{AppConfig, LoggingConfig},
    control::{Command, Contamination},
    session::Session,
};
use std::io::{self, BufRead, Write};
use tracing::{info, warn};

fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("fraud_anomaly_explorer={}", config.level).parse()?);

    // Logs go to stderr so they never interleave with the rendered tables.
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);

    if config.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

fn main() -> Result<()> {
    let config = AppConfig::load()?;
    init_logging(&config.logging)?;

    info!("Starting Transaction Anomaly Explorer");
    info!(
        data = %config.data.path.display(),
        trees = config.detector.n_estimators,
        max_samples = config.detector.max_samples,
        seed = config.detector.seed,
        features = ?[&config.detector.feature_x, &config.detector.feature_y],
        "Configuration loaded successfully"
    );

    let default = Contamination::new(config.control.default_contamination)
        .context("Invalid default contamination")?;
    let mut session = Session::new(&config);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!(
            "\nContamination rate [{:.2}-{:.2}] (Enter = {}, q = quit): ",
            Contamination::MIN,
            Contamination::MAX,
            default
        );
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("Failed to read from stdin")?;

        match Command::parse(&line, default) {
            Ok(Command::Quit) => break,
            Ok(Command::Run(contamination)) => {
                let outcome = session.run(contamination);
                println!("{}", session.display(&outcome));
            }
            Err(e) => {
                warn!(input = %line.trim(), error = %e, "Rejected control input");
                println!("{}", e);
            }
        }
    }

    info!("Explorer shutting down...");
    session.metrics().print_summary();

    Ok(())
}
