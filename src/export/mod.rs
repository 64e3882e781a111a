//! Serializers for normalized journal entries.
//!
//! Provides the `Exporter` trait and the two output forms: sanitized
//! markup for the site and mechanics-DSL notes for the note app.
//!
//! # Architecture
//!
//! Exporters use a builder pattern:
//! - `new()` creates an exporter with default configuration
//! - `with_config()` allows customization
//! - `export()` writes to any `Write` destination
//!
//! Serializers only read their input; the same entry can be handed to
//! both without copying.
//!
//! # Example
//!
//! ```
//! use logbook::export::{Exporter, MechanicsExporter};
//! use logbook::model::{CanonicalNode, JournalEntry};
//!
//! let entry = JournalEntry::new("Session 1", vec![CanonicalNode::paragraph("Hello")]);
//! let mut out = Vec::new();
//! MechanicsExporter::new().export(&entry, &mut out)?;
//! assert!(String::from_utf8(out).unwrap().ends_with("Hello\n\n"));
//! # Ok::<(), logbook::Error>(())
//! ```

use std::io::Write;

use crate::error::Result;
use crate::model::JournalEntry;

mod markup;
mod mechanics;

pub use markup::{escape_xml, render_markup};
pub use mechanics::{MechanicsConfig, MechanicsExporter, render_mechanics};

/// Trait for exporting journal entries to a specific format.
pub trait Exporter {
    /// Export the entry to the provided writer.
    fn export<W: Write>(&self, entry: &JournalEntry, writer: &mut W) -> Result<()>;
}

/// Exporter for site markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupExporter;

impl MarkupExporter {
    pub fn new() -> Self {
        Self
    }
}

impl Exporter for MarkupExporter {
    fn export<W: Write>(&self, entry: &JournalEntry, writer: &mut W) -> Result<()> {
        writer.write_all(render_markup(&entry.content)?.as_bytes())?;
        Ok(())
    }
}

impl Exporter for MechanicsExporter {
    fn export<W: Write>(&self, entry: &JournalEntry, writer: &mut W) -> Result<()> {
        writer.write_all(self.render(entry)?.as_bytes())?;
        Ok(())
    }
}
