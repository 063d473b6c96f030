use serde::{Deserialize, Serialize};

/// A structured job listing. Every field is optional because search
/// providers routinely omit some of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub title: Option<String>,
    pub url: Option<String>,
    pub content: Option<String>,
}

/// One job posting as stored in the cache file: either a structured listing or
/// a free-text blob wrapped as `{"raw_result": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobPosting {
    // Must stay first: `Listing` has only optional fields and would match anything.
    Raw { raw_result: String },
    Listing(Listing),
}

impl JobPosting {
    #[cfg(test)]
    pub fn listing(
        title: impl Into<String>,
        url: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        JobPosting::Listing(Listing {
            title: Some(title.into()),
            url: Some(url.into()),
            content: Some(content.into()),
        })
    }

    pub fn raw(text: impl Into<String>) -> Self {
        JobPosting::Raw {
            raw_result: text.into(),
        }
    }

    #[cfg(test)]
    pub fn title(&self) -> Option<&str> {
        match self {
            JobPosting::Listing(l) => l.title.as_deref(),
            JobPosting::Raw { .. } => None,
        }
    }

    #[cfg(test)]
    pub fn url(&self) -> Option<&str> {
        match self {
            JobPosting::Listing(l) => l.url.as_deref(),
            JobPosting::Raw { .. } => None,
        }
    }

    /// A posting is only worth indexing if it carries some text.
    pub fn is_index_worthy(&self) -> bool {
        let populated = |f: &Option<String>| f.as_deref().is_some_and(|s| !s.trim().is_empty());
        match self {
            JobPosting::Listing(l) => populated(&l.title) || populated(&l.url) || populated(&l.content),
            JobPosting::Raw { raw_result } => !raw_result.trim().is_empty(),
        }
    }
}
