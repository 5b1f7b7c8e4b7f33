use std::fmt;

use serde::Serialize;
use structopt::StructOpt;

use crate::cmd::{with_client, Outcome, Run};
use crate::{Config, Console, Result};

/// Logs in and out again. No session is kept between runs, so this only checks the credentials.
#[derive(StructOpt, Debug, Clone, PartialEq, Eq, Hash)]
#[structopt(rename_all = "kebab")]
pub struct LoginOpt {}

impl Run for LoginOpt {
    fn run(&self, conf: &Config, cnsl: &mut Console) -> Result<Box<dyn Outcome>> {
        let username = with_client(conf, cnsl, |client| Ok(client.username().to_owned()))?;
        Ok(Box::new(LoginOutcome::new(username)))
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoginOutcome {
    username: String,
}

impl LoginOutcome {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

impl fmt::Display for LoginOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Successfully logged in as {}", self.username)
    }
}

impl Outcome for LoginOutcome {}
