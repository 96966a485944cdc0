use crate::archive::ResolvedEntry;
use crate::error::Result;
use crate::extractor::EntrySink;
use crate::selection::Selection;
use crate::ui::OutputFormatter;

/// List-mode sink. Prints one line per selected entry and touches no files.
pub struct ListingSink<'a> {
    formatter: &'a OutputFormatter,
}

impl<'a> ListingSink<'a> {
    pub fn new(formatter: &'a OutputFormatter) -> Self {
        Self { formatter }
    }
}

impl EntrySink for ListingSink<'_> {
    fn consume(&mut self, entry: &ResolvedEntry, selection: &Selection) -> Result<u64> {
        self.formatter.print_listing_entry(entry, selection);
        Ok(0)
    }
}

/// Text form of a listing line: the save name, then `-- <encoding>` when the
/// entry was picked by an encoding rule.
pub fn format_listing_line(selection: &Selection) -> String {
    match selection.listing_label() {
        Some(label) => format!("{}  -- {}", selection.save_name, label),
        None => selection.save_name.clone(),
    }
}
