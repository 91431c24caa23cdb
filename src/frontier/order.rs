// src/frontier/order.rs
// =============================================================================
// Stable numbering for documentation sections and the pages inside them.
//
// The crawl itself visits pages in whatever order links turn up, which can
// change from run to run. These numbers are what the cache layout and the
// catalog are sorted by, so each section and each page gets a number the
// first time it is seen and keeps it for the rest of the process.
//
// Example:
//   section_number("guide") -> 1
//   section_number("api")   -> 2
//   section_number("guide") -> 1   (already assigned)
//   page_number("api", a)   -> 1
//   page_number("api", b)   -> 2
//   page_number("guide", a) -> 1   (page counters are per section)
// =============================================================================

use super::normalize::NormalizedUrl;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct SectionOrder {
    sections: HashMap<String, usize>,
    pages: HashMap<String, HashMap<NormalizedUrl, usize>>,
}

impl SectionOrder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of `section`, assigning the next one (starting
    /// at 1) on first sight.
    pub fn section_number(&mut self, section: &str) -> usize {
        if let Some(&number) = self.sections.get(section) {
            return number;
        }

        let number = self.sections.len() + 1;
        self.sections.insert(section.to_string(), number);
        number
    }

    /// Returns the number of `url` within `section`, assigning the next
    /// one for that section (starting at 1) on first sight.
    pub fn page_number(&mut self, section: &str, url: &NormalizedUrl) -> usize {
        let pages = self.pages.entry(section.to_string()).or_default();
        let next = pages.len() + 1;
        *pages.entry(url.clone()).or_insert(next)
    }
}
