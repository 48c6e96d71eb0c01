//! Response parsing: pull the `<result>` block out of the model's reply.
//!
//! The instruction asks for exactly one block per image:
//!
//! ```text
//! <result1>
//!     <text1>extracted text</text1>
//!     <translation1>translation</translation1>
//! </result1>
//! ```
//!
//! Tag names may carry a numeric suffix (`<result>`, `<result1>`, `<result12>`).
//! One pattern with `\d*` on every tag covers all of them. Models sometimes
//! emit more than one block; only the first is used and the rest are dropped.

use crate::output::ExtractionResult;
use once_cell::sync::Lazy;
use regex::Regex;

static RE_RESULT_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?s)<result\d*>\s*<text\d*>(.*?)</text\d*>\s*<translation\d*>(.*?)</translation\d*>\s*</result\d*>",
    )
    .unwrap()
});

/// Every `(text, translation)` capture in the response, untrimmed, in order.
pub fn parse_blocks(response: &str) -> Vec<(String, String)> {
    RE_RESULT_BLOCK
        .captures_iter(response)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect()
}

/// The first block in the response, trimmed. `None` if the model ignored the
/// grammar.
pub fn parse_first(response: &str) -> Option<ExtractionResult> {
    RE_RESULT_BLOCK
        .captures(response)
        .map(|caps| ExtractionResult::new(caps[1].trim(), caps[2].trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_tags() {
        let r = parse_first("<result><text>Hello.</text><translation>안녕.</translation></result>")
            .unwrap();
        assert_eq!(r, ExtractionResult::new("Hello.", "안녕."));
    }

    #[test]
    fn suffixed_tags_and_whitespace() {
        let response = "Sure! Here you go:\n\n<result1>\n    <text1>\n  Keep out. Danger.  \n</text1>\n    \
                        <translation1>  출입 금지. 위험.\n</translation1>\n</result1>\n";
        let r = parse_first(response).unwrap();
        assert_eq!(r.source_text, "Keep out. Danger.");
        assert_eq!(r.translated_text, "출입 금지. 위험.");
    }

    #[test]
    fn mixed_suffixes_still_match() {
        let r = parse_first("<result3><text>a</text7><translation2>b</translation></result>").unwrap();
        assert_eq!(r, ExtractionResult::new("a", "b"));
    }

    #[test]
    fn multiline_content_is_captured() {
        let r = parse_first("<result><text>line one\nline two</text><translation>x\ny</translation></result>")
            .unwrap();
        assert_eq!(r.source_text, "line one\nline two");
        assert_eq!(r.translated_text, "x\ny");
    }

    #[test]
    fn first_block_wins() {
        let response = "<result1><text1>first</text1><translation1>처음</translation1></result1>\n\
                        <result2><text2>second</text2><translation2>두번째</translation2></result2>";
        assert_eq!(parse_blocks(response).len(), 2);
        let r = parse_first(response).unwrap();
        assert_eq!(r, ExtractionResult::new("first", "처음"));
    }

    #[test]
    fn non_greedy_does_not_span_blocks() {
        let response = "<result><text>A</text><translation>B</translation></result>\
                        <result><text>C</text><translation>D</translation></result>";
        let blocks = parse_blocks(response);
        assert_eq!(blocks[0], ("A".to_string(), "B".to_string()));
        assert_eq!(blocks[1], ("C".to_string(), "D".to_string()));
    }

    #[test]
    fn blocks_are_untrimmed() {
        let blocks = parse_blocks("<result> <text> a </text> <translation>\nb\n</translation> </result>");
        assert_eq!(blocks, vec![(" a ".to_string(), "\nb\n".to_string())]);
    }

    #[test]
    fn no_block_yields_nothing() {
        let response = "I'm sorry, I can't read any text in this image.";
        assert!(parse_blocks(response).is_empty());
        assert!(parse_first(response).is_none());
    }

    #[test]
    fn missing_translation_is_no_match() {
        assert!(parse_first("<result><text>only text</text></result>").is_none());
    }

    #[test]
    fn wrong_order_is_no_match() {
        assert!(parse_first("<result><translation>b</translation><text>a</text></result>").is_none());
    }

    #[test]
    fn empty_content_is_allowed() {
        let r = parse_first("<result><text></text><translation>  </translation></result>").unwrap();
        assert_eq!(r, ExtractionResult::new("", ""));
    }
}
