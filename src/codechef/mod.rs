//! Client for CodeChef.
//!
//! ```no_run
//! use cchef::model::QuestionCode;
//! use cchef::{Client, Console};
//!
//! # fn main() -> cchef::Result<()> {
//! let mut cnsl = Console::term();
//! let mut client = Client::new("chef", "password", &mut cnsl)?;
//! client.login()?;
//! let question = QuestionCode::from("TEST");
//! let submission_id = client.submit(&question, "int main() {}", "cpp")?;
//! let verdict = client.check_result(&submission_id, &question)?;
//! println!("{}", verdict);
//! client.shutdown()?;
//! # Ok(())
//! # }
//! ```

use std::io::Write as _;

use anyhow::Context as _;
use retry::{delay, retry, OperationResult};

use crate::config::SessionConfig;
use crate::model::{Credentials, LangNameRef, LangTable, QuestionCode, SubmissionId, Verdict};
use crate::service::{Browse, Browser, Form, Page};
use crate::{ClientError, Config, Console, Error, Result};

mod status;

pub use status::extract_verdict;

/// Session with the judge.
///
/// Owns its browser and session state and is meant to be used from one thread.
/// Dropping a logged in client logs it out. Use [`Client::shutdown`] to observe
/// the result of that logout.
#[derive(Debug)]
pub struct Client<'a, B: Browse = Browser> {
    browser: B,
    credentials: Credentials,
    base_url: reqwest::Url,
    session: SessionConfig,
    lang_table: LangTable,
    cnsl: &'a mut Console,
    is_logged_in: bool,
}

impl<'a> Client<'a, Browser> {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        cnsl: &'a mut Console,
    ) -> Result<Self> {
        let credentials = Credentials::new(username, password);
        Self::with_config(credentials, &Config::default(), cnsl)
    }

    pub fn with_config(
        credentials: Credentials,
        conf: &Config,
        cnsl: &'a mut Console,
    ) -> Result<Self> {
        let browser = Browser::new(conf.session())?;
        Ok(Self::with_browser(browser, credentials, conf, cnsl))
    }
}

impl<'a, B: Browse> Client<'a, B> {
    pub fn with_browser(
        browser: B,
        credentials: Credentials,
        conf: &Config,
        cnsl: &'a mut Console,
    ) -> Self {
        Self {
            browser,
            credentials,
            base_url: conf.base_url().clone(),
            session: conf.session().clone(),
            lang_table: conf.lang_table(),
            cnsl,
            is_logged_in: false,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.is_logged_in
    }

    pub fn username(&self) -> &str {
        self.credentials.username()
    }

    pub fn lang_table(&self) -> &LangTable {
        &self.lang_table
    }

    /// Logs in with the login form on the top page.
    ///
    /// Login is regarded as failed if the page returned after posting the form still has any form.
    /// Sessions opened elsewhere with the same account are not detected.
    pub fn login(&mut self) -> Result<()> {
        if self.is_logged_in {
            return Err(ClientError::AlreadyLoggedIn.into());
        }

        let page = self.get("/")?;
        let mut form = page.form(0).context("Could not find login form")?;
        form.set_value("name", self.credentials.username().as_str())?;
        form.set_value("pass", self.credentials.password().as_str())?;
        let page = self.submit_form(&form)?;

        if page.count_forms() > 0 {
            return Err(ClientError::RequiresLogin)
                .context("Could not log in. Check username and password.");
        }
        self.is_logged_in = true;
        Ok(())
    }

    /// Requests the logout page. The session is regarded as closed whatever the page says.
    pub fn logout(&mut self) -> Result<()> {
        self.get("/logout")?;
        self.is_logged_in = false;
        Ok(())
    }

    /// Logs out if logged in, and consumes the client.
    ///
    /// A failed logout is returned here and not retried on drop.
    pub fn shutdown(mut self) -> Result<()> {
        if !self.is_logged_in {
            return Ok(());
        }
        let result = self.logout();
        self.is_logged_in = false;
        result
    }

    /// Submits source code and returns the id the judge assigned to the submission.
    ///
    /// The id is the last path segment of the url the judge redirects to,
    /// e.g. `98765` for `/status/98765`. It is not validated.
    pub fn submit(
        &mut self,
        question: &QuestionCode,
        source: &str,
        lang_name: LangNameRef,
    ) -> Result<SubmissionId> {
        self.require_login()?;

        let page = self.get(&format!("/submit/{}", question))?;
        let mut form = page.form(0).context("Could not find submit form")?;
        form.set_value("program", source)?;
        let lang_code = self
            .lang_table
            .get(lang_name)
            .ok_or_else(|| ClientError::IncorrectLanguage(lang_name.to_owned()))?;
        form.set_selection("language", &[lang_code])?;
        let page = self.submit_form(&form)?;

        let submission_id = page
            .url()
            .as_str()
            .rsplit('/')
            .next()
            .map(SubmissionId::from)
            .unwrap_or_else(|| SubmissionId::from(""));
        writeln!(self.cnsl, "Submitted {} as {}", question, submission_id).unwrap_or(());
        Ok(submission_id)
    }

    /// Waits until the judge finishes judging the submission and returns the verdict.
    ///
    /// The status page is requested again every `poll_interval` while the verdict says
    /// running or compiling. With `poll_limit` set, gives up after that many extra requests
    /// with [`ClientError::StillJudging`]. Never call this with an id that was not submitted.
    pub fn check_result(
        &mut self,
        submission_id: &SubmissionId,
        question: &QuestionCode,
    ) -> Result<Verdict> {
        self.require_login()?;

        let path = format!("/status/{}", question);
        let interval = self.session.poll_interval().as_millis() as u64;
        let limit = self.session.poll_limit().unwrap_or(usize::MAX);
        let durations = delay::Fixed::from_millis(interval).take(limit);
        retry(durations, || match self.fetch_verdict(&path, submission_id) {
            Ok(verdict) if verdict.is_terminal() => OperationResult::Ok(verdict),
            Ok(verdict) => {
                writeln!(self.cnsl, "Judging {} ... {}", submission_id, verdict).unwrap_or(());
                OperationResult::Retry(Error::new(ClientError::StillJudging(verdict)))
            }
            Err(err) => OperationResult::Err(err),
        })
        .map_err(|err| match err {
            retry::Error::Operation { error, .. } => error,
            retry::Error::Internal(msg) => Error::msg(msg),
        })
    }

    fn fetch_verdict(&mut self, path: &str, submission_id: &SubmissionId) -> Result<Verdict> {
        let page = self.get(path)?;
        extract_verdict(page.body(), submission_id)
    }

    fn require_login(&self) -> Result<()> {
        if self.is_logged_in {
            Ok(())
        } else {
            Err(ClientError::RequiresLogin.into())
        }
    }

    fn get(&mut self, path: &str) -> Result<Page> {
        let url = self
            .base_url
            .join(path)
            .with_context(|| format!("Could not parse url path : {}", path))?;
        self.browser
            .get(url, self.cnsl)
            .context(ClientError::ConnectionFailed)
    }

    fn submit_form(&mut self, form: &Form) -> Result<Page> {
        self.browser
            .submit(form, self.cnsl)
            .context(ClientError::ConnectionFailed)
    }
}

impl<B: Browse> Drop for Client<'_, B> {
    fn drop(&mut self) {
        if self.is_logged_in {
            if let Err(err) = self.logout() {
                self.cnsl
                    .warn(&format!("Could not log out : {:#}", err))
                    .unwrap_or(());
            }
        }
    }
}
