pub mod highlight;
pub mod output;

pub use highlight::Highlighter;
