//! Synthetic Transaction Generator
//!
//! Writes a transaction CSV for exercising the explorer: mostly ordinary
//! purchases close to home, plus a share of large, far-away fraudulent ones.
//!
//! Usage: generate-transactions [output.csv] [count] [fraud_rate] [seed]

use anyhow::{Context, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Row layout expected by the explorer
#[derive(Debug, Clone, Serialize)]
struct Transaction {
    transaction_id: String,
    amount: f64,
    dist_from_home: f64,
    merchant_category: String,
    is_fraud: u8,
}

/// Transaction generator for testing
struct TransactionGenerator {
    rng: ChaCha8Rng,
    transaction_counter: u64,
}

impl TransactionGenerator {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            transaction_counter: 0,
        }
    }

    fn generate(&mut self, fraud_rate: f64) -> Transaction {
        if self.rng.gen_bool(fraud_rate) {
            self.generate_suspicious()
        } else {
            self.generate_legitimate()
        }
    }

    /// Generate a random legitimate transaction
    fn generate_legitimate(&mut self) -> Transaction {
        self.transaction_counter += 1;

        Transaction {
            transaction_id: format!("tx_{:06}", self.transaction_counter),
            amount: round2(self.rng.gen_range(5.0..250.0)),
            dist_from_home: round2(self.rng.gen_range(0.1..30.0)),
            merchant_category: self
                .random_choice(&["grocery", "restaurant", "fuel", "pharmacy", "retail"])
                .to_string(),
            is_fraud: 0,
        }
    }

    /// Generate a suspicious/fraudulent transaction
    fn generate_suspicious(&mut self) -> Transaction {
        self.transaction_counter += 1;

        Transaction {
            transaction_id: format!("tx_{:06}", self.transaction_counter),
            amount: round2(self.rng.gen_range(1000.0..10000.0)), // High amount
            dist_from_home: round2(self.rng.gen_range(300.0..5000.0)), // Far from home
            merchant_category: self
                .random_choice(&["electronics", "jewelry", "online", "travel"])
                .to_string(),
            is_fraud: 1,
        }
    }

    fn random_choice<'a>(&mut self, choices: &[&'a str]) -> &'a str {
        choices[self.rng.gen_range(0..choices.len())]
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("generate_transactions=info".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let output = args
        .get(1)
        .map(|s| s.as_str())
        .unwrap_or("data/transactions.csv");
    let count: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(1000);
    let fraud_rate: f64 = args
        .get(3)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0.05_f64)
        .clamp(0.0, 1.0);
    let seed: u64 = args.get(4).and_then(|s| s.parse().ok()).unwrap_or(42);

    info!(
        output = %output,
        count = count,
        fraud_rate = fraud_rate,
        seed = seed,
        "Generating synthetic transactions"
    );

    let path = Path::new(output);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mut generator = TransactionGenerator::new(seed);
    let mut suspicious_count = 0u64;

    for _ in 0..count {
        let transaction = generator.generate(fraud_rate);
        suspicious_count += u64::from(transaction.is_fraud);
        writer.serialize(&transaction)?;
    }
    writer.flush()?;

    info!(
        "Completed! Wrote {} transactions ({} legitimate, {} suspicious) to {}",
        count,
        count - suspicious_count,
        suspicious_count,
        path.display()
    );

    Ok(())
}
