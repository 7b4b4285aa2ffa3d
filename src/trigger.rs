//! Decides whether a chat message asks for an image, and which one.

use regex::Regex;

/// Matches `href=` attribute values, quoted or not.
pub const HREF_PATTERN: &str = r#"href=['"]?([^'" >]+)"#;

/// Links found in a message addressed to the URL plugin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UrlTrigger {
    /// The message started with the keyword
    pub shebang_used: bool,
    /// Every linked URL, in the order they appear
    pub urls: Vec<String>,
}

/// Recognises `<keyword> … href="…"` messages.
#[derive(Clone, Debug)]
pub struct UrlKeywordTrigger {
    keyword: String,
    shebang_required: bool,
    href: Regex,
}

impl UrlKeywordTrigger {
    /// # Errors
    ///
    /// Returns an error if the href pattern fails to compile.
    pub fn new(keyword: impl Into<String>, shebang_required: bool) -> Result<Self, regex::Error> {
        Ok(UrlKeywordTrigger {
            keyword: keyword.into(),
            shebang_required,
            href: Regex::new(HREF_PATTERN)?,
        })
    }

    /// `None` when the message is not for this plugin or links nothing.
    #[must_use]
    pub fn parse(&self, text: &str) -> Option<UrlTrigger> {
        let (body, shebang_used) = match text.strip_prefix(self.keyword.as_str()) {
            Some(rest) if !self.keyword.is_empty() => (rest.trim(), true),
            _ if !self.shebang_required => (text, false),
            _ => return None,
        };
        if body.is_empty() {
            return None;
        }

        let urls: Vec<String> = self
            .href
            .captures_iter(body)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .collect();
        if urls.is_empty() {
            return None;
        }
        Some(UrlTrigger { shebang_used, urls })
    }
}

/// Which directory a random pick comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DirectoryPick {
    /// Any image of any keyword
    AnyKeyword,
    /// An image from this keyword's directory
    Keyword(String),
}

/// Recognises `!<keyword>` messages, case-insensitively.
#[derive(Clone, Debug)]
pub struct KeywordDirectoryTrigger {
    baserand: String,
    keywords: Vec<String>,
}

impl KeywordDirectoryTrigger {
    #[must_use]
    pub fn new(baserand: &str, keywords: &[String]) -> Self {
        KeywordDirectoryTrigger {
            baserand: baserand.to_lowercase(),
            keywords: keywords.to_vec(),
        }
    }

    /// Picks requested by `text`; empty when nothing matched.
    ///
    /// The random-from-everything keyword short-circuits. Otherwise every keyword
    /// whose `!` form prefixes the message yields its own pick.
    #[must_use]
    pub fn parse(&self, text: &str) -> Vec<DirectoryPick> {
        let lowered = text.to_lowercase();
        let Some(command) = lowered.strip_prefix('!') else {
            return Vec::new();
        };
        if !self.baserand.is_empty() && command.starts_with(&self.baserand) {
            return vec![DirectoryPick::AnyKeyword];
        }
        self.keywords
            .iter()
            .filter(|keyword| !keyword.is_empty() && command.starts_with(&keyword.to_lowercase()))
            .map(|keyword| DirectoryPick::Keyword(keyword.clone()))
            .collect()
    }
}
