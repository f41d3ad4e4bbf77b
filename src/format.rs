//! How synthesized events are written out by the binary.

use serde::Deserialize;
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use crate::event::EventBatch;
use crate::input::{encode_input_event, EventLayout};
use crate::report::{ReportAssembler, TouchReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// One line per event.
    #[default]
    Events,
    /// One line per assembled touch report.
    Reports,
    /// Binary `struct input_event` records.
    Raw,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Events => write!(f, "events"),
            OutputFormat::Reports => write!(f, "reports"),
            OutputFormat::Raw => write!(f, "raw"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "events" | "text" => Ok(OutputFormat::Events),
            "reports" | "report" => Ok(OutputFormat::Reports),
            "raw" | "binary" => Ok(OutputFormat::Raw),
            _ => Err(format!(
                "Invalid output format '{}'. Valid values: events, reports, raw",
                s
            )),
        }
    }
}

/// Writes batches in one format, keeping report state across frames.
pub struct BatchWriter<W: Write> {
    out: W,
    format: OutputFormat,
    layout: EventLayout,
    reports: ReportAssembler,
}

impl<W: Write> BatchWriter<W> {
    pub fn new(out: W, format: OutputFormat, layout: EventLayout) -> Self {
        Self {
            out,
            format,
            layout,
            reports: ReportAssembler::new(),
        }
    }

    pub fn write_batch(&mut self, batch: &EventBatch) -> io::Result<()> {
        match self.format {
            OutputFormat::Events => {
                for event in batch {
                    writeln!(self.out, "{}", event)?;
                }
            }
            OutputFormat::Reports => {
                for report in self.reports.push_batch(batch) {
                    write_report(&mut self.out, &report)?;
                }
            }
            OutputFormat::Raw => {
                for event in batch {
                    let record = encode_input_event(event.timestamp, &event.to_input_event(), self.layout);
                    self.out.write_all(&record)?;
                }
            }
        }
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn write_report(out: &mut impl Write, report: &TouchReport) -> io::Result<()> {
    let items: Vec<String> = report
        .items
        .iter()
        .map(|item| format!("finger={} {:?} ({},{})", item.finger, item.state, item.x, item.y))
        .collect();
    writeln!(out, "report [{}]", items.join(", "))
}
