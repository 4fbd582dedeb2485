//! pgtune CLI - Command-line interface
//!
//! Prints recommended PostgreSQL settings for the described hardware.

use anyhow::Context;
use clap::Parser;
use pgtune_core::render::{render, OutputFormat};
use pgtune_core::{compute, InputParameters, MemoryUnit, StorageType, WorkloadType};
use std::fs;
use std::path::PathBuf;
use std::process;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pgtune")]
#[command(version, about = "Tune PostgreSQL settings for your hardware", long_about = None)]
struct Args {
    /// Maximum number of PostgreSQL client connections (0 derives it from --db-type)
    #[arg(long, default_value_t = 0)]
    connections: u32,

    /// Number of CPUs, which PostgreSQL can leverage
    /// (CPUs = threads per core * cores per socket * sockets)
    #[arg(long, default_value_t = 0)]
    cpus: u32,

    /// What type of application PostgreSQL is installed for
    /// [possible values: desktop, dw, mixed, oltp, web]
    #[arg(long, default_value = "web")]
    db_type: WorkloadType,

    /// PostgreSQL version - can be found out via 'SELECT version();'
    #[arg(long, default_value = pgtune_core::config::DEFAULT_DB_VERSION)]
    db_version: String,

    /// Type of data storage device [possible values: hdd, san, ssd]
    #[arg(long, default_value = "ssd")]
    hd_type: StorageType,

    /// How much memory PostgreSQL can take advantage of
    #[arg(long, default_value_t = 0)]
    total_memory: u64,

    /// Memory unit [possible values: KB, MB, GB, TB]
    #[arg(long, default_value = "GB")]
    total_memory_unit: MemoryUnit,

    /// Output format [possible values: conf, alter-system, json]
    #[arg(long, default_value = "conf")]
    format: OutputFormat,

    /// Write the result to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn input(&self) -> InputParameters {
        InputParameters::default()
            .with_connections(self.connections)
            .with_cpus(self.cpus)
            .with_workload(self.db_type)
            .with_db_version(self.db_version.clone())
            .with_storage(self.hd_type)
            .with_total_memory(self.total_memory, self.total_memory_unit)
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Validate arguments and render the recommended settings
fn generate(args: &Args) -> anyhow::Result<String> {
    let input = args.input();
    input.validate()?;
    debug!(?input, "tuning");

    let settings = compute(&input);
    let output = render(&input, &settings, args.format)?;
    Ok(output)
}

fn run(args: Args) -> anyhow::Result<()> {
    let output = generate(&args)?;

    match &args.output {
        Some(path) => {
            fs::write(path, &output)
                .with_context(|| format!("Failed to write file '{}'", path.display()))?;
            info!("Settings written to {}", path.display());
        }
        None => print!("{}", output),
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        let mut full = vec!["pgtune"];
        full.extend_from_slice(argv);
        Args::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        assert_eq!(args.connections, 0);
        assert_eq!(args.cpus, 0);
        assert_eq!(args.db_type, WorkloadType::Web);
        assert_eq!(args.db_version, "15");
        assert_eq!(args.hd_type, StorageType::Ssd);
        assert_eq!(args.total_memory, 0);
        assert_eq!(args.total_memory_unit, MemoryUnit::Gb);
        assert_eq!(args.format, OutputFormat::Conf);
        assert!(args.output.is_none());
    }

    #[test]
    fn test_parse_all_flags() {
        let args = parse(&[
            "--connections",
            "250",
            "--cpus",
            "8",
            "--db-type",
            "oltp",
            "--db-version",
            "16",
            "--hd-type",
            "hdd",
            "--total-memory",
            "32",
            "--total-memory-unit",
            "GB",
            "--format",
            "json",
        ]);
        let input = args.input();
        assert_eq!(input.connections, 250);
        assert_eq!(input.cpus, 8);
        assert_eq!(input.workload, WorkloadType::Oltp);
        assert_eq!(input.db_version, "16");
        assert_eq!(input.storage, StorageType::Hdd);
        assert_eq!(input.total_memory_kb(), 32 * 1024 * 1024);
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(Args::try_parse_from(["pgtune", "--db-type", "batch"]).is_err());
        assert!(Args::try_parse_from(["pgtune", "--hd-type", "nvme"]).is_err());
        assert!(Args::try_parse_from(["pgtune", "--total-memory", "-4"]).is_err());
        assert!(Args::try_parse_from(["pgtune", "--total-memory-unit", "PB"]).is_err());
    }

    #[test]
    fn test_generate_conf() {
        let args = parse(&["--total-memory", "16", "--cpus", "4"]);
        let output = generate(&args).unwrap();
        assert!(output.starts_with("# CPUs num: 4\n"));
        assert!(output.contains("shared_buffers = 4GB\n"));
        assert!(output.contains("max_connections = 200\n"));
    }

    #[test]
    fn test_generate_rejects_overflowing_memory() {
        let args = parse(&["--total-memory", "18446744073709551615", "--total-memory-unit", "TB"]);
        let err = generate(&args).unwrap_err();
        assert!(err.to_string().contains("Total memory too large"));
    }

    #[test]
    fn test_run_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("postgresql.tuned.conf");
        let args = parse(&[
            "--db-type",
            "dw",
            "--hd-type",
            "hdd",
            "--total-memory",
            "64",
            "--output",
            path.to_str().unwrap(),
        ]);

        run(args).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("# DB Type: dw\n"));
        assert!(written.contains("huge_pages = try\n"));
        assert!(written.contains("default_statistics_target = 500\n"));
    }
}
