use std::fmt;

use serde::Serialize;
use structopt::StructOpt;

use crate::cmd::{Outcome, Run};
use crate::model::LangTable;
use crate::{Config, Console, Result};

#[derive(StructOpt, Debug, Clone, PartialEq, Eq, Hash)]
#[structopt(rename_all = "kebab")]
pub struct LangsOpt {}

impl Run for LangsOpt {
    fn run(&self, conf: &Config, _cnsl: &mut Console) -> Result<Box<dyn Outcome>> {
        Ok(Box::new(LangsOutcome {
            languages: conf.lang_table(),
        }))
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct LangsOutcome {
    languages: LangTable,
}

impl fmt::Display for LangsOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (name, code) in self.languages.iter() {
            writeln!(f, "{:10} {}", name, code)?;
        }
        Ok(())
    }
}

impl Outcome for LangsOutcome {}
