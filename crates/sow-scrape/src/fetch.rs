//! Live course walk: log in, list sections, download every resource.

use std::future::Future;
use std::path::PathBuf;
use std::thread;

use anyhow::{anyhow, Context, Error, Result};
use crossbeam_channel::bounded;
use futures::{future, stream, StreamExt};
use select::document::Document;
use select::predicate::{Class, Name, Predicate};

use crate::config::{FetchConfig, OnError};
use crate::names;

#[derive(Debug)]
struct Download {
    url: String,
    dest: PathBuf,
}

/// Walks every configured course and downloads its PDF resources into
/// `<output_dir>/<course>/<section>/`.
pub async fn fetch_courses(config: &FetchConfig) -> Result<()> {
    let client = reqwest::ClientBuilder::new()
        .cookie_store(true)
        .user_agent(&config.user_agent)
        .build()?;

    log_in(&client, config).await?;

    let mut jobs = Vec::new();
    for course in &config.courses {
        jobs.extend(course_downloads(&client, config, *course).await?);
    }
    log::info!("Collected {} resource downloads", jobs.len());

    run_downloads(&client, config, jobs).await
}

async fn log_in(client: &reqwest::Client, config: &FetchConfig) -> Result<()> {
    let login_url = format!("{}/login/index.php", config.site_root());
    client
        .post(&login_url)
        .form(&[
            ("username", config.username.as_str()),
            ("password", config.password.as_str()),
        ])
        .send()
        .await?
        .error_for_status()
        .with_context(|| format!("Login failed at {login_url}"))?;
    log::info!("Logged in as {}", config.username);
    Ok(())
}

async fn course_downloads(
    client: &reqwest::Client,
    config: &FetchConfig,
    course: u32,
) -> Result<Vec<Download>> {
    let course_url = format!("{}/course/view.php?id={course}", config.site_root());
    let page = client.get(&course_url).send().await?.text().await?;
    log::debug!("Fetched course overview page {course_url}");

    let section_urls = section_urls(&page, &course_url);
    log::debug!("Course {course} has {} sections", section_urls.len());

    let mut jobs = Vec::new();
    for section_url in &section_urls {
        log::debug!("Looking up section {section_url}");
        let page = client.get(section_url).send().await?.text().await?;
        jobs.extend(section_downloads(&page, config, course)?);
    }
    Ok(jobs)
}

/// Section links on a course overview page point back at the course
/// URL with a `section=` selector. Order preserved, duplicates
/// dropped.
fn section_urls(page: &str, course_url: &str) -> Vec<String> {
    let document = Document::from(page);
    let mut urls: Vec<String> = Vec::new();
    for node in document.find(Name("a")) {
        let href = match node.attr("href") {
            Some(href) => href,
            None => continue,
        };
        if href.starts_with(course_url)
            && href.contains("section=")
            && !urls.iter().any(|u| u == href)
        {
            urls.push(href.to_string());
        }
    }
    urls
}

/// One download job per resource link under each named section. Also
/// creates the target directories.
fn section_downloads(page: &str, config: &FetchConfig, course: u32) -> Result<Vec<Download>> {
    let document = Document::from(page);
    let mut jobs = Vec::new();

    for heading in document.find(Name("h3").and(Class("sectionname"))) {
        let section = names::clean_section_name(&heading.text());
        let dir = config.output_dir.join(course.to_string()).join(&section);
        fs_err::create_dir_all(&dir)?;

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
                None => {
                    log::warn!("Resource link without a name span: {href}");
                    continue;
                }
            };
            log::debug!("Queueing {href} as {file_name}");
            jobs.push(Download {
                url: format!("{href}&redirect=1"),
                dest: dir.join(file_name),
            });
        }
    }
    Ok(jobs)
}

async fn run_downloads(
    client: &reqwest::Client,
    config: &FetchConfig,
    jobs: Vec<Download>,
) -> Result<()> {
    let (tx_file, rx_file) = bounded::<(PathBuf, Vec<u8>)>(config.concurrent_downloads * 2);

    let mut writers = vec![];
    for id in 0..config.num_writers {
        let rx_file = rx_file.clone();
        let writer = thread::Builder::new()
            .name(format!("{id}"))
            .spawn(move || {
                for (path, body) in rx_file.into_iter() {
                    if let Err(e) = fs_err::write(&path, &body) {
                        log::error!("Couldn't write {}: {e}", path.display());
                    }
                }
            })?;
        writers.push(writer);
    }
    drop(rx_file);

    let downloads = stream::iter(jobs)
        .map(|job| {
            let client = client.clone();
            let tx_file = tx_file.clone();
            async move {
                let body = client
                    .get(&job.url)
                    .send()
                    .await?
                    .error_for_status()
                    .with_context(|| format!("Downloading {}", job.url))?
                    .bytes()
                    .await?;
                log::debug!("Got {} bytes for {}", body.len(), job.dest.display());
                tx_file.send((job.dest, body.to_vec())).ok();
                Ok::<(), Error>(())
            }
        })
        .buffer_unordered(config.concurrent_downloads);

    let result = match config.on_dl_error {
        OnError::Fail => {
            let mut err = Ok::<(), Error>(());
            downloads.scan(&mut err, until_err).collect::<Vec<_>>().await;
            err
        }
        OnError::SkipAndLog => {
            downloads
                .filter_map(|dl| async move {
                    dl.map_err(|e| log::warn!("Skipping download: {e:#}")).ok()
                })
                .collect::<Vec<_>>()
                .await;
            Ok(())
        }
    };

    drop(tx_file);
    for writer in writers {
        writer
            .join()
            .map_err(|_| anyhow!("Writer thread panicked"))?;
    }

    result
}

fn until_err<T, E>(
    err: &mut &mut Result<(), E>,
    item: Result<T, E>,
) -> impl Future<Output = Option<T>> {
    match item {
        Ok(item) => future::ready(Some(item)),
        Err(e) => {
            **err = Err(e);
            future::ready(None)
        }
    }
}
