use std::sync::LazyLock;

use regex::Regex;

use super::chapters;

/// Intermediate record produced by segmentation. Exists only while parsing;
/// consumed to produce one or more chunks.
#[derive(Debug, Clone)]
pub struct Article {
    pub number: String,
    pub title: String,
    pub content: String,
    pub chapter: String,
}

/// Regulation family the document belongs to. Selects the segmentation
/// strategy and supplies the fixed metadata (jurisdiction, effective date,
/// chapter table) for that family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegulationFamily {
    Gdpr,
    Ccpa,
    Pipeda,
}

static ARTICLE_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Article\s+(\d+)\s*\n").expect("hard-coded regex compiles"));

static SECTION_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Section\s+(\d+)\s*\n").expect("hard-coded regex compiles"));

impl RegulationFamily {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gdpr => "GDPR",
            Self::Ccpa => "CCPA",
            Self::Pipeda => "PIPEDA",
        }
    }

    pub const fn jurisdiction(self) -> &'static str {
        match self {
            Self::Gdpr => "EU",
            Self::Ccpa => "US-CA",
            Self::Pipeda => "CA",
        }
    }

    pub const fn effective_date(self) -> &'static str {
        match self {
            Self::Gdpr => "2018-05-25",
            Self::Ccpa => "2020-01-01",
            Self::Pipeda => "2001-01-01",
        }
    }

    /// Scan `text` for this family's repeating header pattern and cut it into
    /// articles. A malformed region (missing title or empty body) is dropped
    /// rather than reported, so a document that does not match the expected
    /// layout yields fewer or partial articles.
    pub fn segment(self, text: &str) -> Vec<Article> {
        let header = match self {
            Self::Gdpr | Self::Pipeda => &*ARTICLE_HEADER_RE,
            Self::Ccpa => &*SECTION_HEADER_RE,
        };
        segment_by_header(self, header, text)
    }

    pub fn chapter_for_article(self, article_num: u32) -> &'static str {
        match self {
            Self::Gdpr => chapters::gdpr_chapter_for_article(article_num),
            Self::Ccpa | Self::Pipeda => "1",
        }
    }

    pub fn chapter_title(self, chapter: &str) -> &'static str {
        match self {
            Self::Gdpr => chapters::gdpr_chapter_title(chapter),
            Self::Ccpa => "Consumer privacy",
            Self::Pipeda => "Protection of personal information",
        }
    }
}

impl std::str::FromStr for RegulationFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gdpr" => Ok(Self::Gdpr),
            "ccpa" => Ok(Self::Ccpa),
            "pipeda" => Ok(Self::Pipeda),
            _ => Err(format!("Unknown regulation family: {s}")),
        }
    }
}

fn segment_by_header(family: RegulationFamily, header: &Regex, text: &str) -> Vec<Article> {
    let matches: Vec<_> = header.captures_iter(text).collect();
    let mut articles = Vec::with_capacity(matches.len());

    for (i, caps) in matches.iter().enumerate() {
        let whole = caps.get(0).expect("capture 0 always present");
        let number = &caps[1];

        let block_end = matches
            .get(i + 1)
            .map_or(text.len(), |next| next.get(0).expect("capture 0").start());
        let block = &text[whole.end()..block_end];

        // First line after the header is the title; the rest is the body.
        let (title, content) = match block.split_once('\n') {
            Some((t, c)) => (t.trim(), c.trim()),
            None => (block.trim(), ""),
        };
        if title.is_empty() || content.is_empty() {
            continue;
        }

        let article_num: u32 = match number.parse() {
            Ok(n) => n,
            Err(_) => continue,
        };

        articles.push(Article {
            number: number.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            chapter: family.chapter_for_article(article_num).to_string(),
        });
    }

    articles
}
