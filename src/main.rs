use chrono::Local;
use clap::{Parser, ValueEnum};
use headgate::cli;
use headgate::config::{ExportConfig, ImportConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "headgate")]
#[command(about = "Convert basin model workbooks to per-node series containers and back")]
#[command(long_about = "Headgate - Basin model series conversion

Moves hydrologic model data between a tabular workbook layout (nodes as
columns, time as rows) and per-node ts0 series containers.

MODES:
  w  - Export: read the workbook's data table, resolve each item column to
       a physical type and unit, and write one container per node under
       --outdir.
  r  - Rebuild: read the scenario directory, load each scenario's items
       from its results container, and write a fresh workbook with one
       sheet per scenario.

EXAMPLES:
  headgate --mode w --workbook basin.xlsx --datasheet \"BC1 Data\"
  headgate --mode w --workbook basin.xlsx --datasheet \"BC1 Data\" \\
      --data_range B137:EX2788 --refsheet Reference --refrow 10 --outdir data
  headgate --mode r --workbook basin.xlsx --datasheet \"BC1 Data\" \\
      --header_range A47:BX52 --scenario_sheet Master --scenario_range A3:H8")]
#[command(version)]
struct Cli {
    /// Run in read (r, rebuild workbook) or write (w, export containers) mode
    #[arg(long, value_enum)]
    mode: Mode,

    /// Basin model workbook holding the input data
    #[arg(long)]
    workbook: PathBuf,

    /// Data sheet name
    #[arg(long)]
    datasheet: String,

    /// Range of the data table, header rows included
    #[arg(long = "data_range", default_value = "B137:EX2788")]
    data_range: String,

    /// Sheet pairing node names (col 1) with external ids (col 2)
    #[arg(long, default_value = "Reference")]
    refsheet: String,

    /// First row of the reference table, header excluded
    #[arg(long, default_value = "10")]
    refrow: u32,

    /// Directory receiving exported containers, created if missing
    #[arg(long, default_value = "data")]
    outdir: PathBuf,

    /// Range of the header block naming the Scenario and Item Name rows
    #[arg(long = "header_range", required_if_eq("mode", "r"))]
    header_range: Option<String>,

    /// Sheet listing the scenarios to rebuild
    #[arg(long = "scenario_sheet", default_value = "Master")]
    scenario_sheet: String,

    /// Range of the scenario directory table
    #[arg(long = "scenario_range", required_if_eq("mode", "r"))]
    scenario_range: Option<String>,

    /// Destination workbook for rebuilt scenarios
    /// [default: ts0_<yyyymmdd-HHMM>.xlsx]
    #[arg(long = "temp_workbook")]
    temp_workbook: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Rebuild a workbook from series containers
    #[value(name = "r")]
    Read,
    /// Export series containers from a workbook
    #[value(name = "w")]
    Write,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "headgate=info".into()),
        )
        .init();

    match cli.mode {
        Mode::Write => {
            let config = ExportConfig {
                workbook: cli.workbook,
                datasheet: cli.datasheet,
                data_range: cli.data_range,
                refsheet: cli.refsheet,
                refrow: cli.refrow,
                outdir: cli.outdir,
            };
            cli::export(&config)?;
        }
        Mode::Read => {
            let header_range = cli
                .header_range
                .ok_or_else(|| anyhow::anyhow!("--header_range is required in read mode"))?;
            let scenario_range = cli
                .scenario_range
                .ok_or_else(|| anyhow::anyhow!("--scenario_range is required in read mode"))?;
            let temp_workbook = cli.temp_workbook.unwrap_or_else(|| {
                PathBuf::from(format!("ts0_{}.xlsx", Local::now().format("%Y%m%d-%H%M")))
            });
            let config = ImportConfig {
                workbook: cli.workbook,
                datasheet: cli.datasheet,
                header_range,
                scenario_sheet: cli.scenario_sheet,
                scenario_range,
                temp_workbook,
            };
            cli::import(&config)?;
        }
    }

    Ok(())
}
