//! I/O helpers for catalog input and report output.
//!
//! Input documents are read whole with BOM-aware decoding via `encoding_rs`
//! (a UTF-8 byte-order mark is stripped, matching exports from spreadsheet
//! tools). Report output goes through a `csv::Writer` with
//! `QuoteStyle::Always` for round-trip safety.

use std::{
    fs::{self, File},
    io::{BufWriter, Read},
    path::Path,
};

use anyhow::{Context, Result};
use csv::QuoteStyle;
use encoding_rs::UTF_8;
use encoding_rs_io::DecodeReaderBytesBuilder;

pub fn read_document(path: &Path) -> Result<String> {
    let file = File::open(path).with_context(|| format!("Opening input file {path:?}"))?;
    let mut decoder = DecodeReaderBytesBuilder::new()
        .encoding(Some(UTF_8))
        .utf8_passthru(true)
        .build(file);
    let mut text = String::new();
    decoder
        .read_to_string(&mut text)
        .with_context(|| format!("Decoding input file {path:?}"))?;
    Ok(text)
}

pub fn open_report_writer(path: &Path) -> Result<csv::Writer<BufWriter<File>>> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Creating output directory {parent:?}"))?;
    }
    let file = File::create(path).with_context(|| format!("Creating output file {path:?}"))?;
    let mut builder = csv::WriterBuilder::new();
    builder
        .delimiter(b',')
        .quote_style(QuoteStyle::Always)
        .double_quote(true);
    Ok(builder.from_writer(BufWriter::new(file)))
}
