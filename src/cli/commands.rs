//! The two conversion pipelines behind the CLI.
//!
//! `export` turns a workbook data table into per-node series containers;
//! `import` rebuilds a workbook from containers listed in a scenario
//! directory. Both run to completion or abort on the first error; partial
//! output may exist but no summary of partial success is printed.

use crate::cellref::parse_range;
use crate::config::{ExportConfig, ImportConfig};
use crate::error::{HeadgateError, HeadgateResult};
use crate::reference::ReferenceTable;
use crate::scenario::ScenarioResolver;
use crate::sheet::{transpose, TabularReader};
use crate::store::{read_series, SeriesItem, TimeSeriesWriter};
use crate::units::{resolve, Resolution};
use crate::workbook::WorkbookAssembler;
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use colored::Colorize;
use std::fs::File;
use std::io::BufReader;

/// Export the workbook's data table to one series container per item.
pub fn export(config: &ExportConfig) -> HeadgateResult<()> {
    println!("{}", "Headgate - Exporting series containers".bold().green());
    println!("   Workbook: {}", config.workbook.display());
    println!(
        "   Data sheet: {} ({})",
        config.datasheet.bright_blue(),
        config.data_range
    );
    println!();

    // The workbook handle lives only long enough to pull both sheets.
    let (reference_sheet, data_sheet) = {
        let mut workbook = open_source(config.workbook.as_path())?;
        let reference_sheet = worksheet(&mut workbook, &config.refsheet)?;
        let data_sheet = worksheet(&mut workbook, &config.datasheet)?;
        (reference_sheet, data_sheet)
    };

    let nodes = ReferenceTable::load(&reference_sheet, config.refrow);
    let block = parse_range(&config.data_range)?;
    let table = TabularReader::new(&data_sheet).read_block(&block)?;
    let transposed = transpose(&table)?;

    if !config.outdir.exists() {
        println!(
            "   Creating output folder {}",
            config.outdir.display().to_string().cyan()
        );
    }
    let writer = TimeSeriesWriter::new(&config.outdir);

    let mut written = 0usize;
    let mut skipped = 0usize;
    for series in &transposed.series {
        match resolve(&series.item, series.load, &series.unit)? {
            Resolution::Series(ptype, punit) => {
                let node = nodes.node_for(series.external_id())?;
                let item = SeriesItem {
                    name: series.item.clone(),
                    ptype,
                    punit,
                };
                println!("   Writing {} ({}, {})", series.item.cyan(), ptype, punit);
                writer.write_series(node, &item, &transposed.timestamps, &series.values)?;
                written += 1;
            }
            Resolution::Skipped => skipped += 1,
        }
    }

    println!();
    println!(
        "{}",
        format!(
            "✅ Exported {} series to {} ({} not flagged for load)",
            written,
            writer.outdir().display(),
            skipped
        )
        .bold()
        .green()
    );
    Ok(())
}

/// Rebuild a workbook from the containers named in the scenario directory.
pub fn import(config: &ImportConfig) -> HeadgateResult<()> {
    println!(
        "{}",
        "Headgate - Rebuilding workbook from series containers"
            .bold()
            .green()
    );
    println!("   Workbook: {}", config.workbook.display());
    println!(
        "   Scenario sheet: {} ({})",
        config.scenario_sheet.bright_blue(),
        config.scenario_range
    );
    println!();

    let (directory_sheet, data_sheet) = {
        let mut workbook = open_source(config.workbook.as_path())?;
        let directory_sheet = worksheet(&mut workbook, &config.scenario_sheet)?;
        let data_sheet = worksheet(&mut workbook, &config.datasheet)?;
        (directory_sheet, data_sheet)
    };

    let directory_block = parse_range(&config.scenario_range)?;
    let header_block = parse_range(&config.header_range)?;
    let scenarios = ScenarioResolver::new(&directory_sheet, &data_sheet)
        .resolve(&directory_block, &header_block)?;

    let mut assembler = WorkbookAssembler::new();
    for scenario in &scenarios {
        println!(
            "   Loading {} ({} items) from {}",
            scenario.name.bright_blue().bold(),
            scenario.items.len(),
            scenario.source.display()
        );
        let loaded = read_series(&scenario.source, &scenario.items)?;
        assembler.append_scenario(&scenario.name, &loaded)?;
    }

    let sheet_count = assembler.sheet_count();
    assembler.save(&config.temp_workbook)?;

    println!();
    println!(
        "{}",
        format!(
            "✅ Wrote {} scenario sheet(s) to {}",
            sheet_count,
            config.temp_workbook.display()
        )
        .bold()
        .green()
    );
    Ok(())
}

fn open_source(path: &std::path::Path) -> HeadgateResult<Xlsx<BufReader<File>>> {
    open_workbook(path)
        .map_err(|e| HeadgateError::Sheet(format!("failed to open {}: {}", path.display(), e)))
}

fn worksheet(workbook: &mut Xlsx<BufReader<File>>, name: &str) -> HeadgateResult<Range<Data>> {
    workbook
        .worksheet_range(name)
        .map_err(|e| HeadgateError::Sheet(format!("cannot read sheet '{}': {}", name, e)))
}
