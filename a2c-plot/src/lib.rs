//! Recorder drawing training curves into PNG files with
//! [plotters](https://crates.io/crates/plotters).
mod score_graph;
pub use score_graph::ScoreGraphRecorder;
