/// Selector value that means "no search type chosen".
pub const UNSET_SEARCH_TYPE: &str = "none";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchTypeSelection {
    #[default]
    Unset,
    Selected(String),
}

impl SearchTypeSelection {
    /// Interprets a raw selector value. Blank input and the `none` sentinel are unset.
    pub fn from_input(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(UNSET_SEARCH_TYPE) {
            Self::Unset
        } else {
            Self::Selected(trimmed.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Unset => UNSET_SEARCH_TYPE,
            Self::Selected(name) => name.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a search query.")]
    EmptyQuery,
    #[error("Select Search Type.")]
    SearchTypeUnset,
    #[error("Unknown search type \"{0}\".")]
    InvalidSearchType(String),
}

/// Checks a trigger before any network activity.
///
/// Returns the trimmed query and the search type to use as the endpoint path segment.
pub fn validate_request(
    query: &str,
    selection: &SearchTypeSelection,
) -> Result<(String, String), ValidationError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(ValidationError::EmptyQuery);
    }
    let search_type = match selection {
        SearchTypeSelection::Unset => return Err(ValidationError::SearchTypeUnset),
        SearchTypeSelection::Selected(name) => name,
    };
    if !is_path_safe(search_type) {
        return Err(ValidationError::InvalidSearchType(search_type.clone()));
    }
    Ok((query.to_string(), search_type.clone()))
}

fn is_path_safe(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}
