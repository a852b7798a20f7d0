//! Listing request: optional search term plus pagination

use super::Pagination;

/// Non-empty search term matched as a case-insensitive substring
/// against name, address, city and state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Returns `None` for an empty term, which lists everything.
    pub fn new(s: &str) -> Option<Self> {
        if s.is_empty() {
            None
        } else {
            Some(Self(s.to_owned()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `ILIKE` pattern with `%`, `_` and `\` escaped so the term is
    /// matched literally.
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.0.len() + 2);
        pattern.push('%');
        for c in self.0.chars() {
            if matches!(c, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        pattern
    }

    /// Same predicate as the SQL filter, for stores without SQL.
    pub fn matches(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.0.to_lowercase())
    }
}

/// Everything the listing operation needs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub search: Option<SearchTerm>,
    pub page: Pagination,
}

impl ListQuery {
    pub fn new(search: Option<&str>, page: Pagination) -> Self {
        Self {
            search: search.and_then(SearchTerm::new),
            page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_term_is_absent() {
        assert!(SearchTerm::new("").is_none());
        assert!(ListQuery::new(Some(""), Pagination::default()).search.is_none());
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        let term = SearchTerm::new("50%_off\\").unwrap();
        assert_eq!(term.like_pattern(), "%50\\%\\_off\\\\%");
    }

    #[test]
    fn matches_case_insensitively() {
        let term = SearchTerm::new("cityx").unwrap();
        assert!(term.matches("Old CityX Road"));
        assert!(!term.matches("CityY"));
    }
}
