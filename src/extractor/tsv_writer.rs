use crate::error::{ArdapError, Result};
use crate::extractor::record::{Record, FIELD_NAMES};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Serializes records as a UTF-8 tab-separated table: one header row with
/// the five fixed column names, then one row per record in input order.
///
/// Quoting is minimal: a field is double-quoted only when it would collide
/// with the format (embedded tab, CR, LF or quote), with `""` escaping
/// inside quotes.
pub struct TsvWriter;

const SEPARATOR: char = '\t';

impl TsvWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_to_file<P: AsRef<Path>>(&self, path: P, records: &[Record]) -> Result<()> {
        let path = path.as_ref();

        let file = File::create(path).map_err(|e| ArdapError::OutputWrite {
            path: path.display().to_string(),
            source: e,
        })?;

        let mut writer = BufWriter::new(file);
        self.write(&mut writer, records)
            .and_then(|_| writer.flush())
            .map_err(|e| ArdapError::OutputWrite {
                path: path.display().to_string(),
                source: e,
            })?;

        Ok(())
    }

    pub fn write<W: Write>(&self, mut writer: W, records: &[Record]) -> io::Result<()> {
        write_row(&mut writer, &FIELD_NAMES)?;
        for record in records {
            write_row(&mut writer, &record.values())?;
        }
        Ok(())
    }

    pub fn to_string(&self, records: &[Record]) -> String {
        let mut buf: Vec<u8> = Vec::new();
        // Writing to a Vec cannot fail.
        let _ = self.write(&mut buf, records);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl Default for TsvWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn needs_quotes(field: &str) -> bool {
    field.contains(SEPARATOR)
        || field.contains('"')
        || field.contains('\n')
        || field.contains('\r')
}

fn write_row<W: Write>(mut writer: W, fields: &[&str]) -> io::Result<()> {
    let mut first = true;
    for field in fields {
        if !first {
            write!(writer, "{}", SEPARATOR)?;
        } else {
            first = false;
        }
        if needs_quotes(field) {
            let escaped = field.replace('"', "\"\"");
            write!(writer, "\"{}\"", escaped)?;
        } else {
            write!(writer, "{}", field)?;
        }
    }
    writeln!(writer)
}
