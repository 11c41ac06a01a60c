//! JSON and JSON Lines output for segment records.

use serde::Serialize;
use std::io::{self, Write};

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One JSON document: an object for a single record, an array otherwise
    Json,
    /// One JSON object per line (newline-delimited JSON)
    JsonLines,
}

impl OutputFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Some(Self::JsonLines),
            _ => None,
        }
    }
}

/// Serializes records to a writer.
///
/// JSON Lines records are written as soon as they arrive. JSON records are
/// written in one go by `write_all`, since an array needs every item.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
    items_written: usize,
}

impl<W: Write> OutputWriter<W> {
    /// `pretty` only affects the JSON format.
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
            items_written: 0,
        }
    }

    /// Write one record as a standalone document or line.
    pub fn write<T: Serialize>(&mut self, item: &T) -> io::Result<()> {
        let pretty = self.pretty && self.format == OutputFormat::Json;
        if pretty {
            serde_json::to_writer_pretty(&mut self.writer, item).map_err(io::Error::other)?;
        } else {
            serde_json::to_writer(&mut self.writer, item).map_err(io::Error::other)?;
        }
        writeln!(self.writer)?;
        self.items_written += 1;
        Ok(())
    }

    /// Write a batch: a single object or array for JSON, lines for JSONL.
    pub fn write_all<T: Serialize>(&mut self, items: &[T]) -> io::Result<()> {
        match (self.format, items) {
            (OutputFormat::Json, [single]) => self.write(single),
            (OutputFormat::Json, _) => {
                if self.pretty {
                    serde_json::to_writer_pretty(&mut self.writer, items)
                        .map_err(io::Error::other)?;
                } else {
                    serde_json::to_writer(&mut self.writer, items).map_err(io::Error::other)?;
                }
                writeln!(self.writer)?;
                self.items_written += items.len();
                Ok(())
            }
            (OutputFormat::JsonLines, _) => items.iter().try_for_each(|item| self.write(item)),
        }
    }

    pub fn items_written(&self) -> usize {
        self.items_written
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Row {
        file: &'static str,
        label: &'static str,
    }

    const A: Row = Row {
        file: "a.jpg",
        label: "Deal Seeker",
    };
    const B: Row = Row {
        file: "b.jpg",
        label: "Checking Out",
    };

    fn written<F: FnOnce(&mut OutputWriter<&mut Vec<u8>>)>(
        format: OutputFormat,
        pretty: bool,
        f: F,
    ) -> String {
        let mut buffer = Vec::new();
        let mut writer = OutputWriter::new(&mut buffer, format, pretty);
        f(&mut writer);
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_single_json_record_is_an_object() {
        let out = written(OutputFormat::Json, false, |w| w.write_all(&[A]).unwrap());
        assert!(out.starts_with('{'));
        assert!(out.contains("\"label\":\"Deal Seeker\""));
    }

    #[test]
    fn test_many_json_records_are_an_array() {
        let out = written(OutputFormat::Json, false, |w| {
            w.write_all(&[A, B]).unwrap();
            assert_eq!(w.items_written(), 2);
        });
        assert!(out.starts_with('['));
        assert!(out.trim().ends_with(']'));
    }

    #[test]
    fn test_jsonl_is_never_pretty() {
        let out = written(OutputFormat::JsonLines, true, |w| {
            w.write(&A).unwrap();
            w.write(&B).unwrap();
        });
        let lines: Vec<&str> = out.trim().split('\n').collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("b.jpg"));
    }

    #[test]
    fn test_pretty_json() {
        let out = written(OutputFormat::Json, true, |w| w.write(&A).unwrap());
        assert!(out.contains("\n  \"file\""));
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(OutputFormat::parse("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("JSONL"), Some(OutputFormat::JsonLines));
        assert_eq!(OutputFormat::parse("ndjson"), Some(OutputFormat::JsonLines));
        assert_eq!(OutputFormat::parse("csv"), None);
    }
}
