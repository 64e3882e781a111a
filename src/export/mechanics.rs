//! Mechanics exporter - renders a journal entry as a note with front matter
//! and fenced `mechanics` blocks for the note app's dice plugin.
//!
//! ````text
//! ---
//! title: "Session 1"
//! ---
//!
//! We ran for it.
//!
//! ```mechanics
//! move "Face Danger +edge" {
//!   roll action=8 stat=2 adds=1 vs1=5 vs2=3
//!   - "Take +1 momentum"
//! }
//! ```
//! ````

use std::fmt::Write;

use crate::dom::markup_text;
use crate::error::Result;
use crate::model::{ActionItem, CanonicalNode, Image, JournalEntry};

/// Configuration for mechanics export.
#[derive(Debug, Clone)]
pub struct MechanicsConfig {
    /// Rewrite image paths starting with `.0` to start with `.1`.
    pub image_prefix: Option<(String, String)>,
    /// Line emitted for a separator.
    pub rule_token: String,
}

impl Default for MechanicsConfig {
    fn default() -> Self {
        Self {
            image_prefix: Some(("/img/campaigns".to_string(), "Images/Campaign".to_string())),
            rule_token: "***".to_string(),
        }
    }
}

/// Exporter for mechanics-DSL notes.
#[derive(Debug, Clone, Default)]
pub struct MechanicsExporter {
    config: MechanicsConfig,
}

impl MechanicsExporter {
    /// Create a new MechanicsExporter with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a MechanicsExporter with the specified configuration.
    pub fn with_config(config: MechanicsConfig) -> Self {
        Self { config }
    }

    /// Render one entry as a complete note.
    pub fn render(&self, entry: &JournalEntry) -> Result<String> {
        let mut out = String::new();
        self.front_matter(entry, &mut out)?;

        if let Some(image) = &entry.lead_image {
            out.push_str(&self.embed(&image.src, image.attribution.as_deref()));
            out.push_str("\n\n");
        }

        for node in &entry.content {
            let block = self.block(node)?;
            if block.is_empty() {
                continue;
            }
            out.push_str(&block);
            out.push_str("\n\n");
        }
        Ok(out)
    }

    fn front_matter(&self, entry: &JournalEntry, out: &mut String) -> Result<()> {
        out.push_str("---\n");
        let _ = writeln!(out, "title: {}", quote(entry.title.trim())?);
        let slugline = entry.slugline.as_deref().map(str::trim).filter(|s| !s.is_empty());
        if let Some(slugline) = slugline {
            let _ = writeln!(out, "slugline: {}", quote(slugline)?);
        }
        if let Some(image) = &entry.lead_image {
            self.image_block(image, out)?;
        }
        out.push_str("---\n\n");
        Ok(())
    }

    fn image_block(&self, image: &Image, out: &mut String) -> Result<()> {
        out.push_str("image:\n");
        let _ = writeln!(out, "  src: {}", quote(&self.image_path(&image.src))?);
        if let Some(alt) = &image.alt {
            let _ = writeln!(out, "  alt: {}", quote(alt)?);
        }
        if let Some(attribution) = &image.attribution {
            let _ = writeln!(out, "  attribution: {}", quote(attribution)?);
        }
        Ok(())
    }

    fn block(&self, node: &CanonicalNode) -> Result<String> {
        Ok(match node {
            CanonicalNode::Paragraph { markup } => markup_text(markup),
            CanonicalNode::Separator => self.config.rule_token.clone(),
            CanonicalNode::Figure {
                uri,
                caption,
                attribution,
            } => {
                let mut block = self.embed(uri, attribution.as_deref());
                if let Some(caption) = caption {
                    block.push('\n');
                    block.push_str(caption);
                }
                block
            }
            CanonicalNode::ActionBlock { header, items } => self.action_block(header, items)?,
        })
    }

    fn action_block(&self, header: &str, items: &[ActionItem]) -> Result<String> {
        let mut body = format!("move {} {{\n", quote(header)?);
        for item in items {
            body.push_str("  ");
            match item {
                ActionItem::Roll(roll) => {
                    let _ = write!(
                        body,
                        "roll action={} stat={} adds={} vs1={} vs2={}",
                        roll.action, roll.stat, roll.add, roll.challenge1, roll.challenge2
                    );
                }
                ActionItem::Progress(progress) => {
                    let _ = write!(
                        body,
                        "progress-roll score={} vs1={} vs2={}",
                        progress.score, progress.challenge1, progress.challenge2
                    );
                }
                ActionItem::Plain(text) => {
                    let _ = write!(body, "- {}", quote(text)?);
                }
            }
            body.push('\n');
        }
        body.push('}');

        let fence = "`".repeat(calculate_fence_length(&body, '`'));
        Ok(format!("{fence}mechanics\n{body}\n{fence}"))
    }

    fn embed(&self, src: &str, attribution: Option<&str>) -> String {
        let src = self.image_path(src);
        match attribution {
            Some(attribution) => format!("![[{src}|source: {attribution}]]"),
            None => format!("![[{src}]]"),
        }
    }

    fn image_path(&self, src: &str) -> String {
        if let Some((from, to)) = &self.config.image_prefix
            && let Some(rest) = src.strip_prefix(from.as_str())
        {
            return format!("{to}{rest}");
        }
        src.to_string()
    }
}

/// Render an entry with the default configuration.
pub fn render_mechanics(entry: &JournalEntry) -> Result<String> {
    MechanicsExporter::new().render(entry)
}

fn quote(text: &str) -> Result<String> {
    Ok(serde_json::to_string(text)?)
}

/// Fence length for a code block: one longer than the longest run of
/// `fence_char` in the content, and at least 3.
fn calculate_fence_length(content: &str, fence_char: char) -> usize {
    let mut max_run = 0;
    let mut current_run = 0;

    for c in content.chars() {
        if c == fence_char {
            current_run += 1;
            max_run = max_run.max(current_run);
        } else {
            current_run = 0;
        }
    }

    max_run.max(2) + 1
}
