//! Topic Seeding
//!
//! A topic is free text typed by the user or derived from an uploaded text
//! file. Long file contents are truncated to a bounded prefix and wrapped
//! in a summarization instruction instead of being sent wholesale.

use std::path::Path;

/// Suggested starting topics shown on the home view.
pub const SAMPLE_TOPICS: [&str; 5] = [
    "Photosynthesis",
    "Bitcoin Blockchain",
    "Black Holes",
    "The French Revolution",
    "Machine Learning",
];

/// File contents longer than this are summarized rather than used verbatim.
const SUMMARIZE_THRESHOLD: usize = 200;
/// How much of an oversized file survives into the prompt.
const SUMMARIZE_PREFIX_CHARS: usize = 500;

const SUMMARIZE_INSTRUCTION: &str = "Summarize and explain: ";

/// Turn raw text (typically file contents) into a topic string.
pub fn seed_from_text(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() > SUMMARIZE_THRESHOLD {
        let prefix: String = trimmed.chars().take(SUMMARIZE_PREFIX_CHARS).collect();
        format!("{SUMMARIZE_INSTRUCTION}{prefix}")
    } else {
        trimmed.to_string()
    }
}

/// Seed a topic from a text file on disk.
pub fn seed_from_file(path: &Path) -> std::io::Result<String> {
    let contents = std::fs::read_to_string(path)?;
    Ok(seed_from_text(&contents))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_passes_through() {
        assert_eq!(seed_from_text("  Photosynthesis\n"), "Photosynthesis");
    }

    #[test]
    fn test_long_text_gets_summarize_instruction() {
        let text = "x".repeat(300);
        let seeded = seed_from_text(&text);
        assert!(seeded.starts_with(SUMMARIZE_INSTRUCTION));
        assert_eq!(
            seeded.chars().count(),
            SUMMARIZE_INSTRUCTION.chars().count() + 300
        );
    }

    #[test]
    fn test_oversized_text_is_truncated() {
        let text = "y".repeat(2000);
        let seeded = seed_from_text(&text);
        assert_eq!(
            seeded.chars().count(),
            SUMMARIZE_INSTRUCTION.chars().count() + SUMMARIZE_PREFIX_CHARS
        );
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        // Multibyte content must not panic on a byte-slice boundary.
        let text = "é".repeat(600);
        let seeded = seed_from_text(&text);
        assert!(seeded.ends_with('é'));
    }
}
