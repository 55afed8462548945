//! Study aid for NHA healthcare certification exams.
//!
//! The library owns the whole core: the data model, the file-backed
//! content cache and exam history, the Gemini client, the cache-aware
//! content generator with its throttled image batch runner, exam
//! attempt bookkeeping, and the session controller state machine. The
//! `certprep` binary layers a CLI and a TUI on top.

pub mod batch;
pub mod content;
pub mod exam;
pub mod genai;
pub mod models;
pub mod session;
pub mod storage;
