use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Where the config tables live and where generated pages go.
///
/// Relative paths are resolved against the directory holding the
/// settings file itself, so a scheme folder can be moved wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_config_dir")]
    pub config_dir: PathBuf,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Defaults to `<output_dir>/textbooks`.
    #[serde(default)]
    pub textbook_dir: Option<PathBuf>,

    #[serde(default = "default_textbook_base_url")]
    pub textbook_base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            output_dir: default_output_dir(),
            textbook_dir: None,
            textbook_base_url: default_textbook_base_url(),
        }
    }
}

fn default_config_dir() -> PathBuf {
    PathBuf::from("config")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("scheme")
}

fn default_textbook_base_url() -> String {
    String::from("http://essentials.cambridge.org/mathematics")
}

impl Settings {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = fs_err::File::open(path)?;
        let mut settings: Settings = serde_yaml::from_reader(file)
            .with_context(|| format!("Couldn't parse settings {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        settings.config_dir = base.join(&settings.config_dir);
        settings.output_dir = base.join(&settings.output_dir);
        settings.textbook_dir = Some(match settings.textbook_dir.take() {
            Some(dir) => base.join(dir),
            None => settings.output_dir.join("textbooks"),
        });

        Ok(settings)
    }

    pub fn textbook_dir(&self) -> PathBuf {
        self.textbook_dir
            .clone()
            .unwrap_or_else(|| self.output_dir.join("textbooks"))
    }

    pub fn table(&self, file_name: &str) -> PathBuf {
        self.config_dir.join(file_name)
    }
}
