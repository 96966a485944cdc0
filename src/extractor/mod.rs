pub mod file_extractor;
pub mod listing;
pub mod output_manager;

pub use file_extractor::{ExtractionProgress, PayloadWriter};
pub use listing::ListingSink;
pub use output_manager::{ExtractionReport, ExtractionSummary, OutputManager};

use crate::archive::ResolvedEntry;
use crate::error::Result;
use crate::selection::Selection;

/// Consumer of selected entries. Returns the number of bytes it wrote.
pub trait EntrySink {
    fn consume(&mut self, entry: &ResolvedEntry, selection: &Selection) -> Result<u64>;
}
