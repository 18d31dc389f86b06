//! Runtime: multi-day content calendars and the generation pipeline.
//!
//! The calendar runs the selector repeatedly to plan days ahead and scores
//! the plan's rotation and diversity. The pipeline takes a selected topic
//! through an external generator, validation, artifact sinks and finally
//! back into the history store.

pub mod calendar;
pub mod pipeline;
pub mod types;

pub use calendar::ContentCalendar;
pub use pipeline::{ArtifactSink, ContentGenerator, ContentPipeline};
pub use types::*;
