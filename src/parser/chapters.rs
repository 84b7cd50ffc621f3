//! Static article-number → chapter lookup for the GDPR.
//!
//! The eleven ranges are closed intervals partitioning the positive integers;
//! chapter 11 is the catch-all for anything past the last boundary.

const GDPR_CHAPTERS: [(u32, u32, &str, &str); 11] = [
    (1, 4, "1", "General provisions"),
    (5, 11, "2", "Principles"),
    (12, 23, "3", "Rights of the data subject"),
    (24, 43, "4", "Controller and processor"),
    (
        44,
        50,
        "5",
        "Transfers of personal data to third countries or international organisations",
    ),
    (51, 59, "6", "Independent supervisory authorities"),
    (60, 76, "7", "Cooperation and consistency"),
    (77, 84, "8", "Remedies, liability and penalties"),
    (85, 91, "9", "Provisions relating to specific processing situations"),
    (92, 93, "10", "Delegated acts and implementing acts"),
    (94, u32::MAX, "11", "Final provisions"),
];

pub fn gdpr_chapter_for_article(article_num: u32) -> &'static str {
    GDPR_CHAPTERS
        .iter()
        .find(|(lo, hi, _, _)| (*lo..=*hi).contains(&article_num))
        .map_or("11", |(_, _, chapter, _)| *chapter)
}

pub fn gdpr_chapter_title(chapter: &str) -> &'static str {
    GDPR_CHAPTERS
        .iter()
        .find(|(_, _, ch, _)| *ch == chapter)
        .map_or("Unknown", |(_, _, _, title)| *title)
}
