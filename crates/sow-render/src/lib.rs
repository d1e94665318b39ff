//! Turns a loaded [`SchemeLibrary`] into a set of static HTML pages:
//! an index of all teaching groups, plus a details page, revision
//! cards and a pupil booklet per group.

pub mod pages;

use anyhow::Context;
use sow_scheme::{Scheme, SchemeLibrary, Settings};

/// Writes every page for every allocated scheme under
/// `settings.output_dir`.
pub fn render_site(library: &SchemeLibrary, settings: &Settings) -> anyhow::Result<()> {
    fs_err::create_dir_all(&settings.output_dir)?;

    write_page(settings, "index.html", pages::index(library))?;

    for alloc in library.allocations() {
        let scheme = lookup(library, &alloc.scheme_id)?;
        write_page(
            settings,
            &alloc.details_file_name(),
            pages::details(library, scheme, alloc),
        )?;
        write_page(
            settings,
            &alloc.cards_file_name(),
            pages::cards(scheme, alloc),
        )?;
        write_page(
            settings,
            &alloc.booklet_file_name(),
            pages::booklet(scheme, alloc),
        )?;
    }

    Ok(())
}

fn lookup<'a>(library: &'a SchemeLibrary, scheme_id: &str) -> anyhow::Result<&'a Scheme> {
    library
        .scheme(scheme_id)
        .with_context(|| format!("No scheme found for [{scheme_id}]"))
}

fn write_page(settings: &Settings, file_name: &str, markup: maud::Markup) -> anyhow::Result<()> {
    let path = settings.output_dir.join(file_name);
    fs_err::write(&path, markup.into_string())?;
    log::info!("Wrote {}", path.display());
    Ok(())
}
