//! Minimal CLI: demo dumps and a mapping-vs-bytes benchmark.
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;

use record_dump::samples::{self, Transaction};
use record_dump::{Dumper, IntoValue, RecordTypeRegistry, Schema, Value};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// dump sample records through a schema, as an ordered mapping or compact JSON
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// dump sample transactions and print the result
    Demo(DemoOut),
    /// compare mapping dump + serde_json encoding against direct JSON bytes
    Bench(BenchOut),
}

#[derive(Args, Debug, Clone)]
struct SampleSettings {
    /// number of sample transactions
    #[arg(long, short = 'n', default_value_t = 3)]
    count: usize,

    /// JSON schema description replacing the built-in transaction schema
    #[arg(long)]
    schema: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct DemoOut {
    #[command(flatten)]
    sample_settings: SampleSettings,

    /// dump through the generic mapping path instead of direct JSON
    #[arg(long)]
    mapping: bool,

    /// pretty-print the output
    #[arg(long)]
    pretty: bool,
}

#[derive(clap::Parser, Debug)]
struct BenchOut {
    #[command(flatten)]
    sample_settings: SampleSettings,

    /// timed rounds per strategy
    #[arg(long, default_value_t = 5)]
    rounds: u32,

    /// split the records across rayon worker threads
    #[arg(long)]
    parallel: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl SampleSettings {
    fn load(&self, registry: &RecordTypeRegistry) -> Result<(Schema, Vec<Transaction>)> {
        let schema = match self.schema.as_ref() {
            None => samples::transaction_schema(),
            Some(path) => {
                let src = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read schema file {}", path.display()))?;
                Schema::from_json_str(&src, registry)
                    .with_context(|| format!("invalid schema description ({})", path.display()))?
            }
        };
        Ok((schema, samples::transactions(self.count)))
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        let registry = Arc::new(RecordTypeRegistry::new());
        samples::register(&registry);
        let dumper = Dumper::with_registry(registry);
        match &self.cmd {
            Command::Demo(target) => target.run(&dumper),
            Command::Bench(target) => target.run(&dumper),
        }
    }
}

impl DemoOut {
    fn run(&self, dumper: &Dumper) -> Result<()> {
        let (schema, records) = self.sample_settings.load(dumper.registry())?;
        let value = Value::list(records);
        let json = if self.mapping {
            serde_json::Value::from(dumper.dump_to_mapping(&schema, &value)?)
        } else if self.pretty {
            dumper.dump_to_json_value(&schema, &value)?
        } else {
            let bytes = dumper.dump_to_json_bytes(&schema, &value)?;
            println!("{}", String::from_utf8(bytes)?);
            return Ok(());
        };
        let out = if self.pretty {
            serde_json::to_string_pretty(&json)?
        } else {
            serde_json::to_string(&json)?
        };
        println!("{out}");
        Ok(())
    }
}

impl BenchOut {
    fn run(&self, dumper: &Dumper) -> Result<()> {
        let (schema, records) = self.sample_settings.load(dumper.registry())?;
        let values: Vec<Value> = records.into_iter().map(IntoValue::into_value).collect();
        eprintln!(
            "{} {} records, {} rounds{}",
            "bench".bold(),
            values.len(),
            self.rounds,
            if self.parallel { ", parallel" } else { "" }
        );

        let via_mapping = self.time(|| -> Result<usize> {
            let encode = |v: &Value| -> Result<usize> {
                let mapping = dumper.dump_to_mapping(&schema, v)?;
                Ok(serde_json::to_vec(&mapping)?.len())
            };
            self.total(&values, encode)
        })?;
        let direct = self.time(|| -> Result<usize> {
            self.total(&values, |v| Ok(dumper.dump_to_json_bytes(&schema, v)?.len()))
        })?;

        report("mapping + serde_json", via_mapping);
        report("json bytes", direct);
        if via_mapping.1 != direct.1 {
            eprintln!("{}", "output sizes differ between strategies".red());
        }
        Ok(())
    }

    fn total<F>(&self, values: &[Value], encode: F) -> Result<usize>
    where
        F: Fn(&Value) -> Result<usize> + Sync,
    {
        if self.parallel {
            values.par_iter().map(&encode).sum()
        } else {
            values.iter().map(&encode).sum()
        }
    }

    /// Best-of-`rounds` wall time and the byte count of the last round.
    fn time(&self, mut round: impl FnMut() -> Result<usize>) -> Result<(Duration, usize)> {
        let mut best = Duration::MAX;
        let mut bytes = 0;
        for _ in 0..self.rounds.max(1) {
            let start = Instant::now();
            bytes = round()?;
            best = best.min(start.elapsed());
        }
        Ok((best, bytes))
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn report(label: &str, (elapsed, bytes): (Duration, usize)) {
    eprintln!(
        "  {:<22} {:>10.3?}  {} bytes",
        label.cyan(),
        elapsed,
        bytes.to_string().green()
    );
}
