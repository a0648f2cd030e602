//! Markdown structure extraction for guidance documents.
//!
//! Guidance arrives as loosely-structured markdown, sometimes wrapped in a
//! code fence by the advice service itself. This module strips that
//! wrapper and flattens the document into an ordered stream of structural
//! blocks. Only headings and lists carry meaning downstream; everything
//! else survives as `Paragraph`/`Other` so document order stays intact.
//! Inline formatting (emphasis, links, code spans) is collapsed to plain
//! text and never required.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use regex::Regex;
use std::sync::OnceLock;

/// A structural block in document order.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading { depth: u8, text: String },
    List { items: Vec<String> },
    Paragraph { text: String },
    Other,
}

fn markdown_fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\A```markdown\n(.*)\n```\z").unwrap())
}

fn generic_fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\A```(?:\w*\n)?(.*?)\n?```\z").unwrap())
}

fn enumerator_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\.\s*").unwrap())
}

/// Remove a whole-input code fence left behind by the advice service.
///
/// The service sometimes returns its own markdown wrapped in a
/// ```` ```markdown ```` fence (or a bare ```` ``` ```` fence); the
/// interior is the effective document. Inputs that are not entirely
/// fenced pass through unchanged.
pub fn strip_guidance_fence(input: &str) -> &str {
    let trimmed = input.trim();
    if let Some(caps) = markdown_fence_re().captures(trimmed) {
        tracing::debug!("markdown fence wrapper detected, using interior");
        return caps.get(1).map(|m| m.as_str()).unwrap_or(trimmed);
    }
    if let Some(caps) = generic_fence_re().captures(trimmed) {
        tracing::debug!("generic fence wrapper detected, using interior");
        return caps.get(1).map(|m| m.as_str()).unwrap_or(trimmed);
    }
    trimmed
}

/// Tokenize guidance markdown into ordered structural blocks.
///
/// This cannot fail: pulldown-cmark always yields an event stream, and
/// spans that do not form a heading, list, or paragraph degrade to
/// [`Block::Other`]. The worst case for hopeless input is a stream with
/// no headings and no lists, which the classifier turns into an empty
/// result rather than an error.
pub fn tokenize(input: &str) -> Vec<Block> {
    let source = strip_guidance_fence(input);
    let parser = Parser::new_ext(source, Options::all());

    let mut blocks = Vec::new();
    let mut heading: Option<(u8, String)> = None;
    let mut paragraph: Option<String> = None;
    // Items of the outermost open list; nested lists flatten into it.
    let mut list: Option<Vec<String>> = None;
    let mut list_depth = 0usize;
    let mut item_text: Option<String> = None;

    for event in parser {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                heading = Some((heading_depth(level), String::new()));
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((depth, text)) = heading.take() {
                    blocks.push(Block::Heading {
                        depth,
                        text: text.trim().to_string(),
                    });
                }
            }
            Event::Start(Tag::List(_)) => {
                list_depth += 1;
                if list_depth == 1 {
                    list = Some(Vec::new());
                } else {
                    // A nested list ends the parent item's own text.
                    flush_item(&mut item_text, &mut list);
                }
            }
            Event::End(TagEnd::List(_)) => {
                list_depth = list_depth.saturating_sub(1);
                if list_depth == 0 {
                    if let Some(items) = list.take() {
                        blocks.push(Block::List { items });
                    }
                }
            }
            Event::Start(Tag::Item) => {
                item_text = Some(String::new());
            }
            Event::End(TagEnd::Item) => {
                flush_item(&mut item_text, &mut list);
            }
            Event::Start(Tag::Paragraph) if list_depth == 0 && heading.is_none() => {
                paragraph = Some(String::new());
            }
            Event::End(TagEnd::Paragraph) if list_depth == 0 => {
                if let Some(text) = paragraph.take() {
                    let text = text.trim().to_string();
                    if !text.is_empty() {
                        blocks.push(Block::Paragraph { text });
                    }
                }
            }
            Event::End(TagEnd::CodeBlock) if list_depth == 0 => {
                blocks.push(Block::Other);
            }
            Event::Rule => {
                blocks.push(Block::Other);
            }
            Event::Text(text) | Event::Code(text) => {
                append_text(
                    &mut heading,
                    &mut item_text,
                    &mut paragraph,
                    list_depth,
                    &text,
                );
            }
            Event::SoftBreak | Event::HardBreak => {
                append_text(&mut heading, &mut item_text, &mut paragraph, list_depth, " ");
            }
            _ => {}
        }
    }

    blocks
}

fn heading_depth(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Route inline text to whichever block is currently being assembled.
/// Headings win over list items so that a heading inside a loose list
/// item does not leak into the item text.
fn append_text(
    heading: &mut Option<(u8, String)>,
    item_text: &mut Option<String>,
    paragraph: &mut Option<String>,
    list_depth: usize,
    text: &str,
) {
    if let Some((_, buf)) = heading {
        buf.push_str(text);
    } else if list_depth > 0 {
        if let Some(buf) = item_text {
            buf.push_str(text);
        }
    } else if let Some(buf) = paragraph {
        buf.push_str(text);
    }
}

/// Close the current list item: strip any leading `1. ` enumerator the
/// source kept inside the item text, trim, and append to the open list.
fn flush_item(item_text: &mut Option<String>, list: &mut Option<Vec<String>>) {
    if let Some(text) = item_text.take() {
        let cleaned = enumerator_re().replace(text.trim(), "").trim().to_string();
        if !cleaned.is_empty() {
            if let Some(items) = list {
                items.push(cleaned);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_markdown_fence() {
        let inner = "### Step 1: Register\n\n1. File Form A";
        let fenced = format!("```markdown\n{}\n```", inner);
        assert_eq!(strip_guidance_fence(&fenced), inner);
    }

    #[test]
    fn test_strip_generic_fence() {
        let inner = "## Heading\n\nBody text.";
        let fenced = format!("```\n{}\n```", inner);
        assert_eq!(strip_guidance_fence(&fenced), inner);
    }

    #[test]
    fn test_unfenced_input_unchanged() {
        let input = "## Heading\n\nBody with ``` inline mention.";
        assert_eq!(strip_guidance_fence(input), input);
    }

    #[test]
    fn test_partial_fence_not_stripped() {
        // A fence that opens but has trailing content outside it is not a
        // wrapper.
        let input = "```markdown\n# Heading\n```\ntrailing text";
        assert_eq!(strip_guidance_fence(input), input);
    }

    #[test]
    fn test_tokenize_headings_and_lists() {
        let blocks = tokenize("### Step 1: Register\n\n1. File Form A\n2. Get Certificate B\n");
        assert_eq!(
            blocks,
            vec![
                Block::Heading {
                    depth: 3,
                    text: "Step 1: Register".to_string()
                },
                Block::List {
                    items: vec!["File Form A".to_string(), "Get Certificate B".to_string()]
                },
            ]
        );
    }

    #[test]
    fn test_tokenize_strips_inline_enumerators() {
        // Some guidance re-numbers items inside the item text itself.
        let blocks = tokenize("- 7. Obtain the incorporation certificate\n");
        assert_eq!(
            blocks,
            vec![Block::List {
                items: vec!["Obtain the incorporation certificate".to_string()]
            }]
        );
    }

    #[test]
    fn test_tokenize_flattens_nested_lists() {
        let blocks = tokenize("- Parent item\n  - Child item\n- Sibling item\n");
        assert_eq!(
            blocks,
            vec![Block::List {
                items: vec![
                    "Parent item".to_string(),
                    "Child item".to_string(),
                    "Sibling item".to_string()
                ]
            }]
        );
    }

    #[test]
    fn test_tokenize_inline_formatting_tolerated() {
        let blocks = tokenize("## **Legal** Requirements\n\n- Review the [filing](https://example.com) `form`\n");
        assert_eq!(
            blocks,
            vec![
                Block::Heading {
                    depth: 2,
                    text: "Legal Requirements".to_string()
                },
                Block::List {
                    items: vec!["Review the filing form".to_string()]
                },
            ]
        );
    }

    #[test]
    fn test_tokenize_plain_sentence() {
        let blocks = tokenize("Just a plain sentence with no markdown structure.");
        assert_eq!(
            blocks,
            vec![Block::Paragraph {
                text: "Just a plain sentence with no markdown structure.".to_string()
            }]
        );
    }

    #[test]
    fn test_tokenize_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n\n  ").is_empty());
    }

    #[test]
    fn test_tokenize_code_block_degrades_to_other() {
        let blocks = tokenize("## Setup\n\n```sh\nnpm install\n```\n");
        assert_eq!(
            blocks,
            vec![
                Block::Heading {
                    depth: 2,
                    text: "Setup".to_string()
                },
                Block::Other,
            ]
        );
    }

    #[test]
    fn test_fence_stripping_is_transparent_to_tokenizer() {
        let doc = "### Step 1: Register\n\n1. File Form A";
        let fenced = format!("```markdown\n{}\n```", doc);
        assert_eq!(tokenize(doc), tokenize(&fenced));
    }
}
