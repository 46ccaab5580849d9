pub mod commands;
pub mod ui;
pub mod util;

pub use util::{LoadedResults, OutputFormat, load_results, parse_results};
