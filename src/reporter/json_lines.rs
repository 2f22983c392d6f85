use crate::{
    mapping::MappingId,
    reporter::{CaptureEvent, Reporter},
};
use std::{cell::RefCell, io::Write};

/// Writes one JSON object per captured value
///
/// Write failures are logged and dropped; the engine never sees them.
pub struct JsonLinesReporter<W: Write> {
    writer: RefCell<W>,
}

impl<W: Write> JsonLinesReporter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer: RefCell::new(writer) }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn write_event(&self, event: &CaptureEvent) -> std::io::Result<()> {
        let mut writer = self.writer.borrow_mut();
        serde_json::to_writer(&mut *writer, event)?;
        writer.write_all(b"\n")?;
        writer.flush()
    }
}

impl JsonLinesReporter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> Reporter for JsonLinesReporter<W> {
    fn send(&self, id: &MappingId, value: &str) {
        let event = CaptureEvent::new(id.clone(), value);
        if let Err(e) = self.write_event(&event) {
            log::warn!("Failed to write capture event for {}: {}", id, e);
        }
    }
}
