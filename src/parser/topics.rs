/// Assigns topic labels to a piece of regulation text.
///
/// Pluggable so richer classifiers can replace the keyword matcher without
/// touching the parser's control flow.
pub trait TopicClassifier: Send + Sync {
    /// Ordered set of labels; never empty.
    fn classify(&self, text: &str) -> Vec<String>;
}

/// Fixed keyword families checked by lowercase substring match. An article
/// may carry several labels; output order follows the family definition
/// order, not text order.
pub struct KeywordClassifier;

const TOPIC_FAMILIES: [(&str, &[&str]); 6] = [
    ("consent", &["consent", "agreement", "permission"]),
    ("deletion", &["deletion", "erasure", "right to be forgotten"]),
    ("data_subject_rights", &["data subject", "rights", "access"]),
    ("transfer", &["transfer", "cross-border", "international"]),
    ("breach", &["breach", "notification", "incident"]),
    ("processing", &["processing", "lawful basis", "legitimate"]),
];

impl TopicClassifier for KeywordClassifier {
    fn classify(&self, text: &str) -> Vec<String> {
        let text_lower = text.to_lowercase();

        let topics: Vec<String> = TOPIC_FAMILIES
            .iter()
            .filter(|(_, keywords)| keywords.iter().any(|k| text_lower.contains(k)))
            .map(|(label, _)| (*label).to_string())
            .collect();

        if topics.is_empty() {
            vec!["general".to_string()]
        } else {
            topics
        }
    }
}
