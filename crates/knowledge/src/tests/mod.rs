//! Cross-module tests over a real SQLite index.

mod pipeline;
