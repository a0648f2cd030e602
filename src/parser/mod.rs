pub mod classifier;
pub mod keywords;
pub mod markdown;

pub use classifier::{classify, extract_document_requirements, Layout};
pub use keywords::KeywordRules;
pub use markdown::{strip_guidance_fence, tokenize, Block};

use crate::models::ParsedGuidance;

/// Full parse: fence stripping, tokenization, and classification in one
/// call. Never fails; unusable input yields an empty result.
pub fn parse_guidance(markdown: &str, rules: &KeywordRules) -> ParsedGuidance {
    classify(&tokenize(markdown), rules)
}
