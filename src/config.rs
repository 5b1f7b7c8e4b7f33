//! Config for cchef.
//!
//! Read from `cchef.yaml` in the current directory, or from the path given with `--config`.
//! Every field is optional:
//!
//! ```yaml
//! base_url: https://www.codechef.com
//! session:
//!   timeout: 30s
//!   poll_interval: 1s
//!   poll_limit: ~
//! languages:
//!   rust: "93"
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::Write as _;
use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Context as _};
use getset::{CopyGetters, Getters, MutGetters, Setters};
use lazy_static::lazy_static;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::model::{LangCode, LangName, LangTable};
use crate::{Console, Result};

lazy_static! {
    pub static ref DEFAULT_BASE_URL: Url = Url::parse("https://www.codechef.com").unwrap();
}

#[derive(Serialize, Deserialize, Getters, MutGetters, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    #[get = "pub"]
    base_url: Url,
    #[get = "pub"]
    #[get_mut = "pub"]
    session: SessionConfig,
    languages: BTreeMap<LangName, LangCode>,
}

impl Config {
    pub const FILE_NAME: &'static str = "cchef.yaml";

    /// Loads config from `path`, or from `cchef.yaml` in the current directory.
    ///
    /// Falls back to the default config when no path is given and the default file does not exist.
    pub fn load(path: Option<&Path>, cnsl: &mut Console) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path, cnsl),
            None => {
                let path = Path::new(Self::FILE_NAME);
                if path.is_file() {
                    Self::load_from(path, cnsl)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn load_from(path: &Path, cnsl: &mut Console) -> Result<Self> {
        writeln!(cnsl, "Loading config from {} ...", path.display()).unwrap_or(());
        let file = File::open(path)
            .with_context(|| format!("Could not open config file : {}", path.display()))?;
        let conf: Self =
            serde_yaml::from_reader(file).context("Could not read config file as yaml")?;
        conf.validate()?;
        Ok(conf)
    }

    fn validate(&self) -> Result<()> {
        match self.base_url.scheme() {
            "http" | "https" => {}
            scheme => return Err(anyhow!("Found unsupported scheme in base_url : {}", scheme)),
        }
        if self.base_url.cannot_be_a_base() {
            return Err(anyhow!("Found invalid base_url : {}", self.base_url));
        }
        Ok(())
    }

    /// Default language table with the entries from the config file applied over it.
    pub fn lang_table(&self) -> LangTable {
        let mut table = LangTable::default();
        table.extend(self.languages.clone());
        table
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.clone(),
            session: SessionConfig::default(),
            languages: BTreeMap::new(),
        }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let yaml_str = serde_yaml::to_string(self).map_err(|_| fmt::Error)?;
        write!(f, "{}", yaml_str)
    }
}

#[derive(
    Serialize, Deserialize, CopyGetters, Setters, Debug, Clone, PartialEq, Eq, Hash,
)]
#[serde(default)]
pub struct SessionConfig {
    /// Timeout of each http request.
    #[serde(with = "humantime_serde")]
    #[get_copy = "pub"]
    #[set = "pub"]
    timeout: Duration,
    /// Wait between two requests for the status page while the submission is being judged.
    #[serde(with = "humantime_serde")]
    #[get_copy = "pub"]
    #[set = "pub"]
    poll_interval: Duration,
    /// Maximum number of extra status requests. Polls until a verdict if not set.
    #[get_copy = "pub"]
    #[set = "pub"]
    poll_limit: Option<usize>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            poll_interval: Duration::from_secs(1),
            poll_limit: None,
        }
    }
}
