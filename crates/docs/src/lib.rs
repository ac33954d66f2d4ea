//! Generated documentation for herald publishers.
//!
//! A publisher's description (see [`herald_events::Publisher::description`])
//! may hold a placeholder line, `{events}` by default. [`document`] replaces
//! that line with a block listing every event visible on the type, in one of
//! two layouts:
//!
//! - **pretty**: a titled section with indented, re-flowed descriptions
//! - **sphinx**: a `:events:` field list for reStructuredText tooling
//!
//! # Example
//!
//! ```
//! use herald_docs::{document, DocsConfig};
//! use herald_events::{Declarations, Publisher, Signature};
//!
//! struct Bell;
//!
//! impl Publisher for Bell {
//!     fn declare(events: &mut Declarations<Self>) {
//!         events
//!             .declare("on_ring", Signature::new().param("volume"))
//!             .describe("The bell rang.");
//!     }
//!
//!     fn description() -> Option<&'static str> {
//!         Some("A bell.\n\n{events}")
//!     }
//! }
//!
//! let text = document::<Bell>(&DocsConfig::default());
//! assert_eq!(
//!     text.as_deref(),
//!     Some("A bell.\n\nEvents\n------\non_ring : volume\n    The bell rang.")
//! );
//! ```

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod config;
pub mod error;
pub mod render;
pub mod text;

use herald_events::Publisher;
use tracing::debug;

// Re-export main types
pub use config::{DocStyle, DocsConfig};
pub use error::{Error, Result};
pub use render::{collect, EventDoc, Formatter, PrettyFormatter, SphinxFormatter};
pub use text::{clean, render_description, render_description_with};

/// Rendered description of `P`, or `None` if the type has no description.
pub fn document<P: Publisher>(config: &DocsConfig) -> Option<String> {
    let text = P::description()?;
    let events = collect::<P>();

    debug!(
        publisher = std::any::type_name::<P>(),
        events = events.len(),
        style = %config.style,
        "Rendering event documentation"
    );
    Some(render_description(text, &events, config))
}
