pub mod classifier;
pub mod content;
pub mod liner;
pub mod pdf_parser;

pub use classifier::{Classifier, LineContext, LineFeatures, ReferenceMargins, Scoring};
pub use content::{GlyphFragment, PdfDocument, PdfExtractor, PdfPage, PreExtracted, StrokeSegment};
pub use liner::{Liner, PdfLine};
pub use pdf_parser::PdfParser;
