//! Offline passes over saved course pages: build per-section link
//! lists, and rename files downloaded from those lists.

use std::path::{Path, PathBuf};

use anyhow::Result;
use select::document::Document;
use select::predicate::{Class, Name, Predicate};

use crate::names;

/// Writes every section link found in `contents` to `out`, one URL per
/// line. Returns how many were found.
pub fn section_pages(contents: &Path, out: &Path) -> Result<usize> {
    let html = fs_err::read_to_string(contents)?;
    let document = Document::from(html.as_str());

    let mut urls = Vec::new();
    for node in document.find(Name("a")) {
        if let Some(href) = node.attr("href") {
            if href.contains("course/view.php") && href.contains("section") {
                urls.push(href.to_string());
            }
        }
    }

    fs_err::write(out, urls.join("\n"))?;
    log::info!("Wrote {} section urls to {}", urls.len(), out.display());
    Ok(urls.len())
}

/// For each saved `section*.html` in `dir`, makes a directory named
/// after the section and writes a `pdflinks.txt` of its resource
/// download URLs.
pub fn link_lists(dir: &Path) -> Result<()> {
    for file in section_files(dir)? {
        let html = fs_err::read_to_string(&file)?;
        let document = Document::from(html.as_str());

        for heading in document.find(Name("h3").and(Class("sectionname"))) {
            let section = names::clean_section_name(&heading.text());
            let section_dir = dir.join(&section);
            fs_err::create_dir_all(&section_dir)?;

            let mut lines = Vec::new();
            for href in resource_hrefs(&heading) {
                lines.push(format!("{href}&redirect=1"));
            }
            let mut body = lines.join("\n");
            if !body.is_empty() {
                body.push('\n');
            }
            fs_err::write(section_dir.join("pdflinks.txt"), body)?;
            log::info!("Wrote {} links for section [{section}]", lines.len());
        }
    }
    Ok(())
}

/// Renames files fetched from the link lists, `view.php?id=NN&redirect=1`,
/// to the resource's own name. Files that were never downloaded are
/// skipped with a warning.
pub fn rename_downloads(dir: &Path) -> Result<()> {
    for file in section_files(dir)? {
        let html = fs_err::read_to_string(&file)?;
        let document = Document::from(html.as_str());

        for heading in document.find(Name("h3").and(Class("sectionname"))) {
            let section = names::clean_section_name(&heading.text());
            let container = match heading.parent() {
                Some(container) => container,
                None => continue,
            };
            for node in container.find(Name("a")) {
                let href = match node.attr("href") {
                    Some(href) => href,
                    None => continue,
                };
                if !href.contains("/mod/resource/") {
                    continue;
                }
                let file_name = match node.find(Name("span")).next() {
                    Some(span) => names::resource_file_name(&span.text()),
                    None => continue,
                };
                let id = match names::moodle_id(href) {
                    Some(id) => id,
                    None => {
                        log::warn!("No id in resource href {href}");
                        continue;
                    }
                };
                let old = dir.join(&section).join(format!("view.php?{id}&redirect=1"));
                if !old.exists() {
                    log::warn!("No downloaded file at {}", old.display());
                    continue;
                }
                let new = dir.join(&section).join(&file_name);
                log::info!("Renaming {} to {file_name}", old.display());
                fs_err::rename(old, new)?;
            }
        }
    }
    Ok(())
}

fn resource_hrefs(heading: &select::node::Node) -> Vec<String> {
    let mut hrefs = Vec::new();
    let container = match heading.parent() {
        Some(container) => container,
        None => return hrefs,
    };
    for node in container.find(Name("a")) {
        if let Some(href) = node.attr("href") {
            if href.contains("/mod/resource/") {
                hrefs.push(href.to_string());
            }
        }
    }
    hrefs
}

fn section_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs_err::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with("section") && name.ends_with(".html") {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}
