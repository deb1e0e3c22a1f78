use regex::Regex;

use crate::model::item::TodoItem;

/// Which items to keep by done state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Done,
    Pending,
}

/// Compile a case-insensitive title pattern.
///
/// An invalid regex is retried as a literal, so `td list --grep "(("`
/// still finds titles containing `((`.
pub fn build_title_regex(pattern: &str) -> Option<Regex> {
    Regex::new(&format!("(?i){}", pattern))
        .or_else(|_| Regex::new(&format!("(?i){}", regex::escape(pattern))))
        .ok()
}

/// Filter applied to a listing
#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    pub status: StatusFilter,
    pub title: Option<Regex>,
}

impl ItemFilter {
    pub fn matches(&self, item: &TodoItem) -> bool {
        let status_ok = match self.status {
            StatusFilter::All => true,
            StatusFilter::Done => item.is_done,
            StatusFilter::Pending => !item.is_done,
        };
        status_ok && self.title.as_ref().is_none_or(|re| re.is_match(&item.title))
    }

    /// Items passing the filter, in their original order
    pub fn apply<'a>(&self, items: &'a [TodoItem]) -> Vec<&'a TodoItem> {
        items.iter().filter(|item| self.matches(item)).collect()
    }
}
