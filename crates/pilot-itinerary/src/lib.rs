//! Pilot Itinerary: from final selections to a day-by-day plan
//!
//! ```text
//! TripState ──► build_report ──► TripReport { summary, days, recommendations }
//!                   │                              │
//!          ItinerarySynthesizer              ReportRenderer (handlebars)
//!                                                  │
//!                                               Markdown
//! ```
//!
//! # Example
//!
//! ```
//! use pilot_core::{Selection, StayLength};
//! use pilot_itinerary::ItinerarySynthesizer;
//!
//! let days = ItinerarySynthesizer::new("Gangneung").synthesize(
//!     StayLength::Nights(1),
//!     Some("Seaside Guesthouse"),
//!     &[Selection::new("r-1", "Sundubu", 9_000)],
//!     &[],
//! );
//! assert_eq!(days.len(), 2);
//! assert_eq!(days[0].activities[0].time, "09:00");
//! ```

pub mod renderer;
pub mod report;
pub mod synthesizer;
pub mod templates;

use thiserror::Error;

pub use renderer::{format_won, ReportRenderer, REPORT_TEMPLATE};
pub use report::{build_report, stay_label, TripReport, TripSummary};
pub use synthesizer::{Activity, ActivityKind, ItinerarySynthesizer, ScheduleDay};
pub use templates::{TemplateDef, TemplateSet};

/// Errors raised while loading templates or rendering a report
#[derive(Debug, Error)]
pub enum ItineraryError {
    #[error("template load failed: {0}")]
    Template(String),
    #[error("no template named '{0}'")]
    UnknownTemplate(String),
    #[error("render failed: {0}")]
    Render(String),
}
