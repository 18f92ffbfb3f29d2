//! Line-oriented renderer for terminals and pipes.

use super::{DisplayRenderer, Frame, Scale};
use std::io::Write;
use tracing::warn;

/// How frames are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Expression and display on one line, e.g. `12 + 3 = | 15`.
    #[default]
    Text,
    /// One JSON object per frame.
    Json,
}

pub struct TerminalRenderer<W: Write> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_frame(&mut self, frame: &Frame) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Text => {
                let marker = match (frame.is_error, frame.scale) {
                    (true, _) => "!",
                    (false, Scale::Normal) => " ",
                    (false, Scale::Small) => "-",
                    (false, Scale::Tiny) => "=",
                };
                let active = frame
                    .active_operator
                    .map(|op| format!(" [{}]", op.symbol()))
                    .unwrap_or_default();
                writeln!(
                    self.out,
                    "{:>24} |{}{}{}",
                    frame.expression, marker, frame.display, active
                )?;
            }
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, frame)?;
                writeln!(self.out)?;
            }
        }
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> DisplayRenderer for TerminalRenderer<W> {
    fn render(&mut self, frame: &Frame) {
        if let Err(e) = self.write_frame(frame) {
            warn!("Failed to render frame: {}", e);
        }
    }
}
