pub mod text_element;
pub mod script_element;
pub mod script;
pub mod conf;

pub use text_element::{Style, StyleSet, TextElement};
pub use script_element::{Block, ElementType, ScriptElement};
pub use script::{Script, DEFAULT_AUTHOR, DEFAULT_TITLE};
pub use conf::{Conf, Margins, PdfConf};
