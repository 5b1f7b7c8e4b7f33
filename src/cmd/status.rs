use std::fmt;

use serde::Serialize;
use structopt::StructOpt;

use crate::cmd::{with_client, Outcome, Run};
use crate::console::{sty_g, sty_r};
use crate::model::{QuestionCode, SubmissionId, Verdict};
use crate::{Config, Console, Result};

#[derive(StructOpt, Debug, Clone, PartialEq, Eq, Hash)]
#[structopt(rename_all = "kebab")]
pub struct StatusOpt {
    /// Code of the problem the submission was made to
    #[structopt(name = "question")]
    question: QuestionCode,
    /// Id printed by `submit`
    #[structopt(name = "submission")]
    submission_id: SubmissionId,
}

impl Run for StatusOpt {
    fn run(&self, conf: &Config, cnsl: &mut Console) -> Result<Box<dyn Outcome>> {
        let verdict = with_client(conf, cnsl, |client| {
            client.check_result(&self.submission_id, &self.question)
        })?;
        Ok(Box::new(StatusOutcome {
            question: self.question.clone(),
            submission_id: self.submission_id.clone(),
            verdict,
        }))
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct StatusOutcome {
    question: QuestionCode,
    submission_id: SubmissionId,
    verdict: Verdict,
}

impl fmt::Display for StatusOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let verdict = &self.verdict;
        match (verdict.is_accepted(), verdict.describe()) {
            (true, Some(description)) => write!(f, "{} {}", sty_g(verdict), description),
            (true, None) => write!(f, "{}", sty_g(verdict)),
            (false, Some(description)) => write!(f, "{} {}", sty_r(verdict), description),
            (false, None) => write!(f, "{}", sty_r(verdict)),
        }
    }
}

impl Outcome for StatusOutcome {}
