//! Name cleaning shared by the live fetcher and the offline passes.

use once_cell::sync::Lazy;
use regex::Regex;

static WS_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s\s+").unwrap());
static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W").unwrap());
static MOODLE_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"(id=[0-9]+)").unwrap());

/// Section headings become directory names: whitespace runs collapse
/// to one space and `:` is unusable on some filesystems.
pub fn clean_section_name(name: &str) -> String {
    WS_RUNS
        .replace_all(name, " ")
        .replace(':', ",")
        .trim()
        .to_string()
}

/// Resource link text becomes a PDF file name with every non-word
/// character dropped.
pub fn resource_file_name(link_text: &str) -> String {
    format!("{}.pdf", NON_WORD.replace_all(link_text, ""))
}

/// The `id=NN` query fragment of a resource href, as downloaded files
/// are initially named after it.
pub fn moodle_id(href: &str) -> Option<&str> {
    MOODLE_ID.find(href).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_names_are_cleaned() {
        assert_eq!(
            clean_section_name("Topic 3:  Further\n   calculus "),
            "Topic 3, Further calculus"
        );
        assert_eq!(clean_section_name("Plain"), "Plain");
    }

    #[test]
    fn resource_names_drop_non_word_chars() {
        assert_eq!(
            resource_file_name("Section test 1 (solutions)"),
            "Sectiontest1solutions.pdf"
        );
    }

    #[test]
    fn moodle_id_extraction() {
        assert_eq!(
            moodle_id("https://x.org/mod/resource/view.php?id=4242"),
            Some("id=4242")
        );
        assert_eq!(moodle_id("https://x.org/course/view.php"), None);
    }
}
