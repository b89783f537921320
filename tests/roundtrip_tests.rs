//! Round-trip tests
//!
//! Export a workbook's data table to containers, rebuild a workbook from
//! those same containers, and check that the numeric matrix and timestamp
//! axis survive both directions.

#![allow(deprecated)] // Command::cargo_bin deprecation - no stable replacement yet

use assert_cmd::Command;
use calamine::{open_workbook, Data, Reader, Xlsx};
use rust_xlsxwriter::Workbook;
use std::path::Path;
use tempfile::TempDir;

const RELATIVE_TOLERANCE: f64 = 1e-9;

const TIMESTAMPS: [&str; 3] = [
    "2021-03-01 00:00:00",
    "2021-03-02 00:00:00",
    "2021-03-03 00:00:00",
];
const FLOW_VALUES: [f64; 3] = [12.125, 7.75, 1001.5];
const RETURN_VALUES: [f64; 3] = [0.125, 0.375, 0.0625];

fn assert_close(found: f64, expected: f64) {
    let bound = expected.abs().max(1.0) * RELATIVE_TOLERANCE;
    assert!(
        (found - expected).abs() <= bound,
        "{} differs from {} by more than {}",
        found,
        expected,
        bound
    );
}

/// Source workbook: data block B5:D10 with two loaded items, plus the
/// reference table mapping their ids to node names.
fn write_source_workbook(path: &Path) {
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name("BC1 Data").unwrap();
    sheet.write_string(4, 2, "[cfs]").unwrap();
    // The return-flow column carries no unit string.
    sheet.write_string(5, 2, "123|Flow").unwrap();
    sheet.write_string(5, 3, "456|Return").unwrap();
    sheet.write_number(6, 2, 1.0).unwrap();
    sheet.write_number(6, 3, 1.0).unwrap();
    for (i, ts) in TIMESTAMPS.iter().enumerate() {
        let row = (7 + i) as u32;
        sheet.write_string(row, 1, *ts).unwrap();
        sheet.write_number(row, 2, FLOW_VALUES[i]).unwrap();
        sheet.write_number(row, 3, RETURN_VALUES[i]).unwrap();
    }

    let reference = workbook.add_worksheet();
    reference.set_name("Reference").unwrap();
    reference.write_string(9, 0, "Alpha").unwrap();
    reference.write_string(9, 1, "123").unwrap();
    reference.write_string(10, 0, "Beta").unwrap();
    reference.write_string(10, 1, "456").unwrap();

    workbook.save(path).unwrap();
}

/// Rebuild workbook: each exported container becomes its own scenario
/// with a single-item column span.
fn write_rebuild_workbook(path: &Path, flow_source: &Path, return_source: &Path) {
    let mut workbook = Workbook::new();

    let master = workbook.add_worksheet();
    master.set_name("Master").unwrap();
    master.write_string(2, 0, "Scenario").unwrap();
    master.write_string(2, 1, "File").unwrap();
    master.write_string(2, 2, "Load").unwrap();
    master.write_string(3, 0, "FlowRun").unwrap();
    master
        .write_string(3, 1, flow_source.to_str().unwrap())
        .unwrap();
    master.write_number(3, 2, 1.0).unwrap();
    master.write_string(4, 0, "ReturnRun").unwrap();
    master
        .write_string(4, 1, return_source.to_str().unwrap())
        .unwrap();
    master.write_number(4, 2, 1.0).unwrap();

    let sheet = workbook.add_worksheet();
    sheet.set_name("BC1 Data").unwrap();
    sheet.write_string(46, 0, "Scenario").unwrap();
    sheet.write_string(48, 0, "Item Name").unwrap();
    // FlowRun owns column C, ReturnRun column D through sheet end.
    sheet.write_string(46, 2, "FlowRun").unwrap();
    sheet.write_string(46, 3, "ReturnRun").unwrap();
    sheet.write_string(48, 2, "123|Flow").unwrap();
    sheet.write_string(48, 3, "456|Return").unwrap();

    workbook.save(path).unwrap();
}

fn number_at(range: &calamine::Range<Data>, row: u32, col: u32) -> f64 {
    match range.get_value((row, col)) {
        Some(Data::Float(f)) => *f,
        Some(Data::Int(i)) => *i as f64,
        other => panic!("expected a number at ({}, {}), got {:?}", row, col, other),
    }
}

#[test]
fn test_forward_then_reverse_preserves_the_matrix() {
    let dir = TempDir::new().unwrap();
    let source_wb = dir.path().join("basin.xlsx");
    let outdir = dir.path().join("data");
    write_source_workbook(&source_wb);

    Command::cargo_bin("headgate")
        .unwrap()
        .args([
            "--mode",
            "w",
            "--workbook",
            source_wb.to_str().unwrap(),
            "--datasheet",
            "BC1 Data",
            "--data_range",
            "B5:D10",
            "--refsheet",
            "Reference",
            "--refrow",
            "10",
            "--outdir",
            outdir.to_str().unwrap(),
        ])
        .assert()
        .success();

    let flow_source = outdir.join("Alpha.ts0");
    let return_source = outdir.join("Beta_rf.ts0");
    assert!(flow_source.exists());
    assert!(return_source.exists());

    let rebuild_wb = dir.path().join("instructions.xlsx");
    let dest = dir.path().join("rebuilt.xlsx");
    write_rebuild_workbook(&rebuild_wb, &flow_source, &return_source);

    Command::cargo_bin("headgate")
        .unwrap()
        .args([
            "--mode",
            "r",
            "--workbook",
            rebuild_wb.to_str().unwrap(),
            "--datasheet",
            "BC1 Data",
            "--header_range",
            "A47:A49",
            "--scenario_sheet",
            "Master",
            "--scenario_range",
            "A3:C6",
            "--temp_workbook",
            dest.to_str().unwrap(),
        ])
        .assert()
        .success();

    let mut rebuilt: Xlsx<_> = open_workbook(&dest).unwrap();
    assert_eq!(
        rebuilt.sheet_names(),
        vec!["FlowRun".to_string(), "ReturnRun".to_string()]
    );

    let flow_sheet = rebuilt.worksheet_range("FlowRun").unwrap();
    assert_eq!(
        flow_sheet.get_value((0, 1)),
        Some(&Data::String("123|Flow".into()))
    );
    for (i, expected) in FLOW_VALUES.iter().enumerate() {
        let row = (i + 1) as u32;
        assert_eq!(
            flow_sheet.get_value((row, 0)),
            Some(&Data::String(TIMESTAMPS[i].into()))
        );
        assert_close(number_at(&flow_sheet, row, 1), *expected);
    }

    let return_sheet = rebuilt.worksheet_range("ReturnRun").unwrap();
    assert_eq!(
        return_sheet.get_value((0, 1)),
        Some(&Data::String("456|Return".into()))
    );
    for (i, expected) in RETURN_VALUES.iter().enumerate() {
        let row = (i + 1) as u32;
        assert_eq!(
            return_sheet.get_value((row, 0)),
            Some(&Data::String(TIMESTAMPS[i].into()))
        );
        assert_close(number_at(&return_sheet, row, 1), *expected);
    }
}
