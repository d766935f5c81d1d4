pub mod element_builder;
pub mod fountain_parser;
pub mod text_processor;

pub use element_builder::ElementBuilder;
pub use fountain_parser::{split_raw_lines, FountainParser, LineState, RawLine};
pub use text_processor::{drop_empty_runs, parse_markup, trim_line_end, trim_line_start};
