use std::env;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use sow_scheme::{extract, SchemeLibrary, Settings};
use sow_scrape::{fetch_courses, FetchConfig, OnError};
use tokio::runtime;

/// Scheme of work toolkit
#[derive(Debug, Parser)]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub cmd: SubCommand,
}

#[derive(Debug, clap::Subcommand)]
pub enum SubCommand {
    Build(BuildArgs),
    Fetch(FetchArgs),
    Links(LinksArgs),
    Objectives(ObjectivesArgs),
    #[command(hide = true)]
    Completion,
}

/// Build scheme pages from the CSV config tables
#[derive(Debug, clap::Args)]
pub struct BuildArgs {
    /// Path to the settings file
    #[arg(long, short, default_value = "sow.yaml")]
    pub settings: PathBuf,
    /// Override the config tables directory
    #[arg(long)]
    pub config_dir: Option<PathBuf>,
    /// Override the output directory
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
    /// When quiet no logs are outputted
    #[arg(long, short)]
    pub quiet: bool,
}

pub fn build(args: BuildArgs) -> anyhow::Result<()> {
    let mut settings = Settings::load(&args.settings)?;
    if let Some(config_dir) = args.config_dir {
        settings.config_dir = config_dir;
    }
    if let Some(output_dir) = args.output_dir {
        settings.output_dir = output_dir;
    }
    let library = SchemeLibrary::load(&settings)?;
    sow_render::render_site(&library, &settings)
}

/// Download course resources from the learning site
#[derive(Debug, clap::Args)]
pub struct FetchArgs {
    /// Path to the fetch yaml configuration file
    #[arg(env = "SOW_FETCH_CONFIG", long, short)]
    pub config: PathBuf,
    /// Override the configured user agent
    #[arg(long)]
    pub user_agent: Option<String>,
    /// Override the maximum concurrent downloads
    #[arg(long)]
    pub concurrent_downloads: Option<usize>,
    /// Override the download error handling strategy
    #[arg(value_enum, long)]
    pub on_dl_error: Option<OnError>,
    /// When quiet no logs are outputted
    #[arg(long, short)]
    pub quiet: bool,
}

impl TryFrom<&FetchArgs> for FetchConfig {
    type Error = anyhow::Error;

    fn try_from(args: &FetchArgs) -> Result<Self, Self::Error> {
        let mut conf = FetchConfig::load(&args.config)?;
        if let Some(user_agent) = &args.user_agent {
            conf.user_agent = user_agent.to_string();
        }
        if let Some(concurrent_downloads) = args.concurrent_downloads {
            conf.concurrent_downloads = concurrent_downloads;
        }
        if let Some(on_dl_error) = args.on_dl_error {
            conf.on_dl_error = on_dl_error;
        }
        Ok(conf)
    }
}

pub fn fetch(args: FetchArgs) -> anyhow::Result<()> {
    let conf = (&args).try_into()?;
    let rt = runtime::Builder::new_multi_thread().enable_all().build()?;
    rt.block_on(fetch_courses(&conf))
}

/// Build link lists from saved course pages
#[derive(Debug, clap::Args)]
pub struct LinksArgs {
    /// What to do with the saved pages
    #[arg(value_enum, long, short)]
    pub action: LinksAction,
    /// Directory holding the saved pages
    #[arg(long, short, default_value = ".")]
    pub dir: PathBuf,
    /// The saved course contents page (sections action)
    #[arg(long, default_value = "contents.html")]
    pub contents: PathBuf,
    /// Where the section url list goes (sections action)
    #[arg(long, default_value = "sectionurls.txt")]
    pub out: PathBuf,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum LinksAction {
    /// List section page urls from the course contents page
    Sections,
    /// Write a pdflinks.txt per section
    Lists,
    /// Rename downloaded files to their resource names
    Rename,
}

pub fn links(args: LinksArgs) -> anyhow::Result<()> {
    match args.action {
        LinksAction::Sections => {
            sow_scrape::section_pages(&args.dir.join(&args.contents), &args.dir.join(&args.out))?;
        }
        LinksAction::Lists => sow_scrape::link_lists(&args.dir)?,
        LinksAction::Rename => sow_scrape::rename_downloads(&args.dir)?,
    }
    Ok(())
}

/// Extract learning objectives from a scheme of work text export
#[derive(Debug, clap::Args)]
pub struct ObjectivesArgs {
    /// The text export to read
    pub input: PathBuf,
    /// Where the objective lines go
    pub output: PathBuf,
}

pub fn objectives(args: ObjectivesArgs) -> anyhow::Result<()> {
    let reader = BufReader::new(fs_err::File::open(&args.input)?);
    let mut writer = BufWriter::new(fs_err::File::create(&args.output)?);
    let count = extract::extract_objectives(reader, &mut writer)?;
    writer.flush()?;
    log::info!("Extracted {count} objectives into {}", args.output.display());
    Ok(())
}

fn init_logs(quiet: bool, filter: &str) {
    if !quiet {
        env::set_var("RUST_LOG", filter);
        env_logger::init();
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.cmd {
        SubCommand::Build(args) => {
            init_logs(args.quiet, "sow_scheme=info,sow_render=info");
            build(args)
        }
        SubCommand::Fetch(args) => {
            init_logs(args.quiet, "sow_scrape=info");
            fetch(args)
        }
        SubCommand::Links(args) => {
            init_logs(false, "sow_scrape=info");
            links(args)
        }
        SubCommand::Objectives(args) => {
            init_logs(false, "sow=info,sow_scheme=info");
            objectives(args)
        }
        SubCommand::Completion => {
            generate(Shell::Bash, &mut Args::command(), "sow", &mut io::stdout());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        Args::command().debug_assert();
    }

    #[test]
    fn links_action_is_a_flag() {
        let args = Args::try_parse_from(["sow", "links", "--action", "lists"]).unwrap();
        match args.cmd {
            SubCommand::Links(links) => assert!(matches!(links.action, LinksAction::Lists)),
            cmd => panic!("unexpected subcommand {cmd:?}"),
        }
    }

    #[test]
    fn links_action_is_required() {
        assert!(Args::try_parse_from(["sow", "links"]).is_err());
    }
}
