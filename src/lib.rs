//! # logbook
//!
//! Normalizes campaign journal entries written in a rich-text editor into
//! a canonical node sequence, then renders that sequence as sanitized site
//! markup or as mechanics-DSL notes.
//!
//! ## Features
//!
//! - Group bracketed action lines into action blocks, keyed by a vocabulary
//!   of move and asset names
//! - Parse and classify dice rolls (strong hit, weak hit, miss, match)
//! - Attach image credits and captions to figures
//! - Import whole campaign dumps, with faction write-ups turned into lore
//!
//! ## Quick Start
//!
//! ```
//! use logbook::{Normalizer, Vocabulary, VocabularyEntry};
//! use logbook::export::render_markup;
//! use logbook::model::CanonicalNode;
//!
//! let vocabulary = Vocabulary::build([VocabularyEntry::new("Face Danger")]);
//! let nodes = Normalizer::new(&vocabulary).normalize_markup(
//!     "<p>[Face Danger +edge]</p>\
//!      <p>[Face Danger: Strong Hit: 8 + 2 + 1 = 11 vs 5 | 3]</p>\
//!      <p>We made it.</p>",
//! );
//! assert!(matches!(&nodes[0], CanonicalNode::ActionBlock { header, items }
//!     if header == "Face Danger +edge" && items.len() == 1));
//!
//! let html = render_markup(&nodes).unwrap();
//! assert!(html.contains(r#"class="roll strong-hit""#));
//! ```

pub mod dom;
pub mod error;
pub mod export;
pub mod import;
pub mod model;
pub mod normalize;
pub mod util;
pub mod vocabulary;

pub use error::{Error, Result};
pub use export::{Exporter, MarkupExporter, MechanicsConfig, MechanicsExporter};
pub use import::{ImportConfig, import_campaigns, parse_canonical};
pub use model::{ActionItem, CanonicalNode, JournalEntry, Outcome, RawNode, RollResult};
pub use normalize::{NormalizeConfig, Normalizer};
pub use vocabulary::{Vocabulary, VocabularyEntry};
