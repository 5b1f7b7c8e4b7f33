#![warn(clippy::all)]

#[macro_use]
extern crate strum;

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context as _;
use serde::Serialize;
use structopt::StructOpt;
use strum::VariantNames;

mod cmd;
pub mod codechef;
pub mod config;
pub mod console;
mod error;
mod macros;
pub mod model;
pub mod service;

pub use codechef::Client;
pub use config::Config;
pub use console::Console;
pub use error::ClientError;

use cmd::{Cmd, OutcomeSerialize as _, Run as _};

pub type Error = anyhow::Error;
pub type Result<T> = anyhow::Result<T>;

#[derive(
    Serialize,
    EnumString,
    EnumVariantNames,
    IntoStaticStr,
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum OutputFormat {
    Default,
    Debug,
    Json,
    Yaml,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Default
    }
}

#[derive(StructOpt, Debug, Clone, PartialEq, Eq, Hash)]
#[structopt(rename_all = "kebab")]
pub struct Opt {
    #[structopt(flatten)]
    global_opt: GlobalOpt,
    #[structopt(subcommand)]
    cmd: Cmd,
}

#[derive(StructOpt, Default, Debug, Clone, PartialEq, Eq, Hash)]
#[structopt(rename_all = "kebab")]
pub struct GlobalOpt {
    /// Path to config file. Defaults to `cchef.yaml` in the current directory if it exists.
    #[structopt(long, global = true, env = "CCHEF_CONFIG", parse(from_os_str))]
    config: Option<PathBuf>,
    /// Format of the outcome printed to stdout
    #[structopt(
        long,
        global = true,
        default_value = "default",
        possible_values = &OutputFormat::VARIANTS,
    )]
    output: OutputFormat,
}

impl Opt {
    pub fn run(&self, stdout: &mut dyn Write, cnsl: &mut Console) -> Result<()> {
        let conf = Config::load(self.global_opt.config.as_deref(), cnsl)
            .context("Could not load config")?;
        let outcome = self.cmd.run(&conf, cnsl)?;
        outcome.print(stdout, self.global_opt.output)?;
        stdout.flush()?;
        Ok(())
    }
}
