//! File-backed rendering for retouch sessions: the display projection and
//! histogram charts are written as PNGs to a preview directory.

pub mod chart;
pub mod writer;

pub use chart::render_histogram;
pub use writer::PreviewWriter;
