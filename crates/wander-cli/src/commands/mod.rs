pub mod book;
pub mod common;
pub mod completions;
pub mod list;
pub mod stats;
