#![allow(dead_code)]

use std::fs::File;
use std::io::Error;
use std::path::Path;

pub const START: &str = "2023-01-01";

pub fn write_spend_csv(path: &Path, rows: &[[&str; 2]]) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(["period", "spend"])?;
    for row in rows {
        wtr.write_record(row)?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn state_file(dir: &Path) -> std::path::PathBuf {
    dir.join("sralab-tools-pto-calculator.json")
}
