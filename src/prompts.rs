//! Instruction prompts for VLM-based text extraction and translation.
//!
//! The output grammar expected by [`crate::pipeline::parse`] is described
//! here and nowhere else.
//!
//! Callers can override the instruction via
//! [`crate::config::ExtractionConfig::instruction`]; the template here is used
//! only when no override is provided.

use crate::config::LanguagePair;

/// Instruction template. `{source}` and `{target}` are replaced with the
/// language names from [`LanguagePair`].
pub const DEFAULT_INSTRUCTION_TEMPLATE: &str = r#"<task>
    <instruction>
        Extract the {source} text from the image and translate it into {target}.
        Place the result for the image inside a single <result> tag, and join the
        extracted text sentence by sentence.
        There must be exactly one <result> tag per image.
        Write the result in the following XML format:
        <result1>
            <text1>extracted {source} text</text1>
            <translation1>{target} translation</translation1>
        </result1>
    </instruction>
</task>"#;

/// Render the instruction for the given language pair.
pub fn build_instruction(languages: &LanguagePair) -> String {
    DEFAULT_INSTRUCTION_TEMPLATE
        .replace("{source}", &languages.source)
        .replace("{target}", &languages.target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_instruction_names_languages() {
        let prompt = build_instruction(&LanguagePair::default());
        assert!(prompt.contains("Extract the English text"));
        assert!(prompt.contains("translate it into Korean"));
        assert!(!prompt.contains('{'), "unrendered placeholder in: {prompt}");
    }

    #[test]
    fn instruction_describes_suffixed_grammar() {
        let prompt = build_instruction(&LanguagePair::new("German", "French"));
        assert!(prompt.contains("<result1>"));
        assert!(prompt.contains("<text1>extracted German text</text1>"));
        assert!(prompt.contains("<translation1>French translation</translation1>"));
    }
}
