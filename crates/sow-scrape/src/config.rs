use std::cmp;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Where and how to fetch course resources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Site root, e.g. `https://2017.integralmaths.org`.
    pub base_url: String,

    pub username: String,

    pub password: String,

    /// Moodle course ids to walk.
    pub courses: Vec<u32>,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_concurrent_downloads")]
    pub concurrent_downloads: usize,

    #[serde(default = "default_num_writers")]
    pub num_writers: usize,

    #[serde(default = "default_on_dl_error")]
    pub on_dl_error: OnError,
}

impl FetchConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = fs_err::File::open(path)?;
        serde_yaml::from_reader(file)
            .with_context(|| format!("Couldn't parse fetch config {}", path.display()))
    }

    pub fn site_root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("resources")
}

fn default_user_agent() -> String {
    String::from("SowBot")
}

fn default_concurrent_downloads() -> usize {
    8
}

fn default_num_writers() -> usize {
    cmp::max(1, num_cpus::get().saturating_sub(2))
}

fn default_on_dl_error() -> OnError {
    OnError::SkipAndLog
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OnError {
    Fail,
    SkipAndLog,
}
