//! Output rendering
//!
//! Turns computed settings into text a DBA can apply directly: a
//! `postgresql.conf` fragment, a batch of `ALTER SYSTEM` statements, or a
//! JSON document for tooling.

use crate::error::{Result, TuneError};
use crate::types::{InputParameters, OutputSettings, Setting};
use serde::Serialize;
use std::str::FromStr;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `key = value` lines for postgresql.conf
    #[default]
    Conf,
    /// `ALTER SYSTEM SET key = 'value';` statements
    AlterSystem,
    /// Pretty-printed JSON with input and settings
    Json,
}

impl FromStr for OutputFormat {
    type Err = TuneError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "conf" => Ok(OutputFormat::Conf),
            "alter-system" | "alter_system" | "sql" => Ok(OutputFormat::AlterSystem),
            "json" => Ok(OutputFormat::Json),
            _ => Err(TuneError::InvalidOutputFormat(s.to_string())),
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    input: &'a InputParameters,
    settings: &'a OutputSettings,
}

/// Render settings in the requested format
pub fn render(
    input: &InputParameters,
    settings: &OutputSettings,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Conf => Ok(render_conf(input, settings)),
        OutputFormat::AlterSystem => Ok(render_alter_system(input, settings)),
        OutputFormat::Json => {
            let report = JsonReport { input, settings };
            Ok(serde_json::to_string_pretty(&report)?)
        }
    }
}

/// Comment block echoing the input parameters
pub fn header(input: &InputParameters) -> String {
    let mut lines = Vec::new();
    if input.connections > 0 {
        lines.push(format!("# Connection num: {}", input.connections));
    }
    lines.push(format!("# CPUs num: {}", input.cpus));
    lines.push(format!("# Data Storage: {}", input.storage));
    lines.push(format!("# DB Type: {}", input.workload));
    lines.push(format!("# DB Version: {}", input.db_version));
    lines.push(format!("# OS Type: {}", crate::config::OS_TYPE));
    lines.push(format!(
        "# Total Memory (RAM): {} {}",
        input.total_memory, input.memory_unit
    ));

    let mut out = String::new();
    for line in lines {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Header, blank line, then one formatted line per setting
fn render_lines(
    input: &InputParameters,
    settings: &OutputSettings,
    line: impl Fn(&Setting) -> String,
) -> String {
    let mut out = header(input);
    out.push('\n');
    for setting in settings.entries() {
        out.push_str(&line(&setting));
        out.push('\n');
    }
    out
}

pub fn render_conf(input: &InputParameters, settings: &OutputSettings) -> String {
    render_lines(input, settings, |s| format!("{} = {}", s.name, s.value))
}

pub fn render_alter_system(input: &InputParameters, settings: &OutputSettings) -> String {
    render_lines(input, settings, |s| {
        format!("ALTER SYSTEM SET {} = '{}';", s.name, s.value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuner::compute;
    use crate::types::{MemoryUnit, StorageType, WorkloadType};

    fn web_16gb() -> InputParameters {
        InputParameters::default()
            .with_workload(WorkloadType::Web)
            .with_storage(StorageType::Ssd)
            .with_total_memory(16, MemoryUnit::Gb)
            .with_cpus(4)
    }

    #[test]
    fn test_render_conf() {
        let input = web_16gb();
        let settings = compute(&input);
        let output = render(&input, &settings, OutputFormat::Conf).unwrap();

        let expected = "\
# CPUs num: 4
# Data Storage: ssd
# DB Type: web
# DB Version: 15
# OS Type: Linux
# Total Memory (RAM): 16 GB

checkpoint_completion_target = 0.9
default_statistics_target = 100
effective_cache_size = 12GB
effective_io_concurrency = 200
huge_pages = off
maintenance_work_mem = 1GB
max_connections = 200
max_parallel_workers = 4
max_wal_size = 4GB
min_wal_size = 1GB
random_page_cost = 1.1
shared_buffers = 4GB
wal_buffers = 16MB
work_mem = 10485KB
";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_header_includes_connections_only_when_set() {
        let input = web_16gb();
        assert!(!header(&input).contains("Connection num"));

        let input = input.with_connections(150);
        assert!(header(&input).starts_with("# Connection num: 150\n"));
    }

    #[test]
    fn test_render_alter_system() {
        let input = InputParameters::default()
            .with_workload(WorkloadType::DataWarehouse)
            .with_storage(StorageType::Hdd)
            .with_total_memory(64, MemoryUnit::Gb)
            .with_cpus(8);
        let settings = compute(&input);
        let output = render(&input, &settings, OutputFormat::AlterSystem).unwrap();

        assert!(output.contains("# DB Type: dw\n"));
        assert!(output.contains("ALTER SYSTEM SET huge_pages = 'try';\n"));
        assert!(output.contains("ALTER SYSTEM SET random_page_cost = '4';\n"));
        assert!(output.contains("ALTER SYSTEM SET maintenance_work_mem = '2GB';\n"));
        assert_eq!(output.matches("ALTER SYSTEM SET").count(), 14);
    }

    #[test]
    fn test_render_alter_system_layout() {
        let input = web_16gb().with_connections(150);
        let settings = compute(&input);
        let output = render_alter_system(&input, &settings);
        let lines: Vec<&str> = output.lines().collect();

        // 7 header lines, a blank separator, then one statement per setting
        assert_eq!(lines.len(), 7 + 1 + 14);
        assert_eq!(lines[0], "# Connection num: 150");
        assert_eq!(lines[6], "# Total Memory (RAM): 16 GB");
        assert_eq!(lines[7], "");
        assert_eq!(lines[8], "ALTER SYSTEM SET checkpoint_completion_target = '0.9';");
        assert_eq!(lines[14], "ALTER SYSTEM SET max_connections = '150';");
        assert_eq!(lines[21], "ALTER SYSTEM SET work_mem = '13981KB';");
        assert!(output.ends_with("';\n"));
    }

    #[test]
    fn test_render_json() {
        let input = web_16gb();
        let settings = compute(&input);
        let output = render(&input, &settings, OutputFormat::Json).unwrap();

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["input"]["workload"], "web");
        assert_eq!(value["input"]["memory_unit"], "GB");
        assert_eq!(value["settings"]["shared_buffers"], "4GB");
        assert_eq!(value["settings"]["huge_pages"], "off");
        assert_eq!(value["settings"]["max_connections"], 200);
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("conf".parse::<OutputFormat>().unwrap(), OutputFormat::Conf);
        assert_eq!("SQL".parse::<OutputFormat>().unwrap(), OutputFormat::AlterSystem);
        assert_eq!(
            "alter-system".parse::<OutputFormat>().unwrap(),
            OutputFormat::AlterSystem
        );
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_settings_lookup_by_name() {
        let settings = compute(&web_16gb());
        assert_eq!(settings.get("wal_buffers").as_deref(), Some("16MB"));
        assert_eq!(settings.get("checkpoint_completion_target").as_deref(), Some("0.9"));
        assert_eq!(settings.get("fsync"), None);
    }
}
