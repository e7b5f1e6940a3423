use std::fmt;

/// Kind of a learning content item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Video,
    Article,
    Instruction,
}

impl ContentKind {
    /// Parse the stored/submitted kind string; unknown kinds are rejected
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "video" => Some(ContentKind::Video),
            "article" => Some(ContentKind::Article),
            "instruction" => Some(ContentKind::Instruction),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ContentKind::Video => "video",
            ContentKind::Article => "article",
            ContentKind::Instruction => "instruction",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
