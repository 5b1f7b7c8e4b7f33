use std::fmt;
use std::fs;
use std::path::PathBuf;

use anyhow::Context as _;
use serde::Serialize;
use structopt::StructOpt;

use crate::cmd::{with_client, Outcome, Run};
use crate::console::{sty_g, sty_r};
use crate::model::{LangName, QuestionCode, SubmissionId, Verdict};
use crate::{ClientError, Config, Console, Error, Result};

#[derive(StructOpt, Debug, Clone, PartialEq, Eq, Hash)]
#[structopt(rename_all = "kebab")]
pub struct SubmitOpt {
    /// Code of the problem, e.g. TEST
    #[structopt(name = "question")]
    question: QuestionCode,
    /// Path to the source file
    #[structopt(name = "source", parse(from_os_str))]
    source_path: PathBuf,
    /// Language of the source, as listed by `langs`
    #[structopt(short, long)]
    lang: LangName,
    /// Waits for the verdict after submitting
    #[structopt(short, long)]
    wait: bool,
}

impl SubmitOpt {
    fn load_source(&self) -> Result<String> {
        let source = fs::read_to_string(&self.source_path).with_context(|| {
            format!("Could not read source file : {}", self.source_path.display())
        })?;
        if source.trim().is_empty() {
            return Err(Error::msg("Found empty source file"));
        }
        Ok(source)
    }
}

impl Run for SubmitOpt {
    fn run(&self, conf: &Config, cnsl: &mut Console) -> Result<Box<dyn Outcome>> {
        if conf.lang_table().get(&self.lang).is_none() {
            return Err(ClientError::IncorrectLanguage(self.lang.clone()).into());
        }
        let source = self.load_source()?;

        let (submission_id, verdict) = with_client(conf, cnsl, |client| {
            let submission_id = client.submit(&self.question, &source, &self.lang)?;
            let verdict = if self.wait {
                Some(client.check_result(&submission_id, &self.question)?)
            } else {
                None
            };
            Ok((submission_id, verdict))
        })?;

        Ok(Box::new(SubmitOutcome {
            question: self.question.clone(),
            submission_id,
            verdict,
        }))
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubmitOutcome {
    question: QuestionCode,
    submission_id: SubmissionId,
    verdict: Option<Verdict>,
}

impl fmt::Display for SubmitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Submitted {} (submission id: {})",
            self.question, self.submission_id
        )?;
        if let Some(verdict) = &self.verdict {
            let description = verdict.describe().unwrap_or("");
            if verdict.is_accepted() {
                write!(f, "\n{} {}", sty_g(verdict), description)?;
            } else {
                write!(f, "\n{} {}", sty_r(verdict), description)?;
            }
        }
        Ok(())
    }
}

impl Outcome for SubmitOutcome {}
