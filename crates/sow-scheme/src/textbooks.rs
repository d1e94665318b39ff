//! Discovery of teaching PDF files shipped alongside the generated pages.
//!
//! File names encode which scheme, unit and section they belong to,
//! e.g. `cemks3_8c_tr_a1_2_something_it.pdf` is section 2 of unit `a1`
//! in scheme `8c`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

static TEXTBOOK_PDF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^cemks3_([a-z0-9]+)_tr_([a-z0-9]+)[_.]([0-9]).*_it\.pdf$").unwrap()
});

/// A teaching PDF attached to one unit of one scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextbookLink {
    /// Path relative to the output directory, usable as a local href.
    pub path: PathBuf,
    /// Short display title, e.g. `A1.2`.
    pub title: String,
    /// The publisher's online copy of the same section.
    pub url: String,
}

/// Scans `textbook_dir` and groups matching files under their
/// lowercased `<scheme_id><unit_id>` key, sorted by file name.
pub fn find_textbook_links(
    textbook_dir: &Path,
    output_dir: &Path,
    base_url: &str,
) -> anyhow::Result<HashMap<String, Vec<TextbookLink>>> {
    let mut links: HashMap<String, Vec<TextbookLink>> = HashMap::new();

    let pattern = textbook_dir.join("**").join("*.pdf");
    let pattern = pattern.to_string_lossy().into_owned();
    let mut paths = Vec::new();
    for path in glob::glob(&pattern)? {
        paths.push(path?);
    }
    paths.sort();

    for path in paths {
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => continue,
        };
        let caps = match TEXTBOOK_PDF.captures(name) {
            Some(caps) => caps,
            None => continue,
        };
        let sid = caps[1].to_lowercase();
        let uid = caps[2].to_lowercase();
        let section = &caps[3];

        log::info!("Found textbook file {name} for scheme [{sid}] unit [{uid}]");

        let rel = path.strip_prefix(output_dir).unwrap_or(&path).to_path_buf();
        let link = TextbookLink {
            path: rel,
            title: format!("{}.{}", uid.to_uppercase(), section),
            url: format!("{base_url}/{sid}/{uid}/{section}"),
        };
        links.entry(format!("{sid}{uid}")).or_default().push(link);
    }

    Ok(links)
}
