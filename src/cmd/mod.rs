use std::{fmt, io};

use anyhow::Context as _;
use serde::Serialize;
use structopt::StructOpt;

use crate::model::Credentials;
use crate::{Client, Config, Console, OutputFormat, Result};

mod langs;
mod login;
mod show;
mod status;
mod submit;

pub use langs::{LangsOpt, LangsOutcome};
pub use login::{LoginOpt, LoginOutcome};
pub use show::ShowOpt;
pub use status::{StatusOpt, StatusOutcome};
pub use submit::{SubmitOpt, SubmitOutcome};

static USERNAME_ENV: &str = "CCHEF_USERNAME";
static PASSWORD_ENV: &str = "CCHEF_PASSWORD";

pub trait Outcome: OutcomeSerialize {}

pub trait OutcomeSerialize: fmt::Display + fmt::Debug {
    fn write_json(&self, writer: &mut dyn io::Write) -> Result<()>;

    fn write_yaml(&self, writer: &mut dyn io::Write) -> Result<()>;

    fn print(&self, stdout: &mut dyn io::Write, format: OutputFormat) -> Result<()> {
        match format {
            OutputFormat::Default => writeln!(stdout, "{}", self)?,
            OutputFormat::Debug => writeln!(stdout, "{:?}", self)?,
            OutputFormat::Json => {
                self.write_json(stdout)?;
                writeln!(stdout)?;
            }
            OutputFormat::Yaml => self.write_yaml(stdout)?,
        }
        Ok(())
    }
}

impl<T: Serialize + fmt::Display + fmt::Debug> OutcomeSerialize for T {
    fn write_json(&self, writer: &mut dyn io::Write) -> Result<()> {
        serde_json::to_writer_pretty(writer, self).context("Could not print outcome as json")
    }

    fn write_yaml(&self, writer: &mut dyn io::Write) -> Result<()> {
        serde_yaml::to_writer(writer, self).context("Could not print outcome as yaml")
    }
}

pub trait Run {
    fn run(&self, conf: &Config, cnsl: &mut Console) -> Result<Box<dyn Outcome>>;
}

#[derive(StructOpt, Debug, Clone, PartialEq, Eq, Hash)]
#[structopt(rename_all = "kebab")]
pub enum Cmd {
    /// Shows current config
    Show(ShowOpt),
    /// Shows languages available for submission
    Langs(LangsOpt),
    /// Checks that username and password are accepted
    Login(LoginOpt),
    /// Submits source code
    Submit(SubmitOpt),
    /// Waits for the verdict of a submission
    Status(StatusOpt),
}

impl Run for Cmd {
    fn run(&self, conf: &Config, cnsl: &mut Console) -> Result<Box<dyn Outcome>> {
        match self {
            Self::Show(opt) => opt.run(conf, cnsl),
            Self::Langs(opt) => opt.run(conf, cnsl),
            Self::Login(opt) => opt.run(conf, cnsl),
            Self::Submit(opt) => opt.run(conf, cnsl),
            Self::Status(opt) => opt.run(conf, cnsl),
        }
    }
}

fn read_credentials(cnsl: &mut Console) -> Result<Credentials> {
    let username = cnsl
        .get_env_or_prompt_and_read(USERNAME_ENV, "username: ", false)
        .context("Could not read username")?;
    let password = cnsl
        .get_env_or_prompt_and_read(PASSWORD_ENV, "password: ", true)
        .context("Could not read password")?;
    Ok(Credentials::new(username, password))
}

/// Runs `f` inside a logged in session. The session is closed even if `f` fails.
fn with_client<T>(
    conf: &Config,
    cnsl: &mut Console,
    f: impl FnOnce(&mut Client<'_>) -> Result<T>,
) -> Result<T> {
    let credentials = read_credentials(cnsl)?;
    let mut client = Client::with_config(credentials, conf, cnsl)?;
    client.login()?;
    let result = f(&mut client);
    let shutdown_result = client.shutdown().context("Could not log out");
    let ret = result?;
    shutdown_result?;
    Ok(ret)
}
