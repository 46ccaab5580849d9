pub mod output;
pub mod render;

pub use output::Output;
