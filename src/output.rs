//! JSON persistence of merged records.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::stream::Record;

/// Write `records` as a pretty-printed JSON array indented by four spaces.
pub fn to_writer<W: Write>(writer: W, records: &[Record]) -> serde_json::Result<()> {
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = Serializer::with_formatter(writer, formatter);
    records.serialize(&mut ser)
}

pub fn write_json<P: AsRef<Path>>(path: P, records: &[Record]) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    to_writer(&mut writer, records)?;
    writer.flush()
}
