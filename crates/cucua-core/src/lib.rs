// cucua-core: issue model, segment building and suggestion application.
//
// Everything here is pure and synchronous. The grammar service itself lives
// behind `cucua-check`.

pub mod analysis;
pub mod apply;
pub mod document;
pub mod issue;
pub mod offset;
pub mod segment;

pub use analysis::{Analysis, AnalysisMeta};
pub use apply::{apply_all_suggestions, apply_suggestion};
pub use document::{CheckedText, Document, DocumentError, Revision, TextSnapshot};
pub use issue::{Issue, Severity};
pub use segment::{Segment, SpanError, build_segments, try_build_segments};
