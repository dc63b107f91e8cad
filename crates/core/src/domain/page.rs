use crate::domain::entry::CatalogEntry;

/// One page of search results plus its pagination metadata. Replaced
/// wholesale on every successful search; never merged or appended.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultPage {
    pub entries: Vec<CatalogEntry>,
    pub current_page: u32,
    pub total_pages: u32,
    pub has_next: bool,
}

impl ResultPage {
    pub fn empty() -> Self {
        ResultPage {
            entries: Vec::new(),
            current_page: 1,
            total_pages: 1,
            has_next: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ResultPage {
    fn default() -> Self {
        ResultPage::empty()
    }
}
