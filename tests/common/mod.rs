#![allow(dead_code)]

use std::collections::VecDeque;
use std::time::Duration;

use anyhow::anyhow;
use reqwest::Url;

use cchef::service::{Browse, Form, Page};
use cchef::{Config, Console, Result};

pub const BASE_URL: &str = "https://www.codechef.com";

pub const LOGIN_PAGE: &str = r#"
<html><body>
<form action="/" method="post" id="new-login-form">
  <input type="text" name="name">
  <input type="password" name="pass">
  <input type="hidden" name="form_id" value="new_login_form">
  <input type="submit" name="op" value="Login">
</form>
</body></html>
"#;

pub const HOME_PAGE: &str = "<html><body><p>Welcome back, chef</p></body></html>";

pub const SUBMIT_PAGE: &str = r#"
<html><body>
<form action="/submit/TEST" method="post" enctype="multipart/form-data">
  <textarea name="program"></textarea>
  <select name="language">
    <option value="11">C</option>
    <option value="44">C++14</option>
    <option value="10">Java</option>
    <option value="116">Python3</option>
    <option value="4">Python2</option>
  </select>
  <input type="hidden" name="problem_code" value="TEST">
  <input type="submit" value="Submit">
</form>
</body></html>
"#;

pub fn status_page(submission_id: &str, token: &str) -> String {
    format!(
        r#"<table class="dataTable">
<tr><td>98700</td><td><span title='RA'></span></td></tr>
<tr><td>{}</td><td><span title='{}'></span></td></tr>
</table>"#,
        submission_id, token
    )
}

macro_rules! assert_match {
    ($a:expr => $b:pat) => {
        assert!(match $a {
            $b => true,
            _ => false,
        });
    };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Get(Url),
    Submit(Form),
}

/// Browser returning canned pages in order and recording every request.
#[derive(Debug, Default)]
pub struct ScriptedBrowser {
    responses: VecDeque<std::result::Result<Page, String>>,
    requests: Vec<Request>,
}

impl ScriptedBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&mut self, path: &str, body: impl Into<String>) -> &mut Self {
        let url = Url::parse(BASE_URL).unwrap().join(path).unwrap();
        self.responses.push_back(Ok(Page::new(url, body)));
        self
    }

    pub fn fail(&mut self, msg: &str) -> &mut Self {
        self.responses.push_back(Err(msg.to_owned()));
        self
    }

    /// Scripts a successful login.
    pub fn respond_login(&mut self) -> &mut Self {
        self.respond("/", LOGIN_PAGE).respond("/node", HOME_PAGE)
    }

    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests
            .iter()
            .map(|req| match req {
                Request::Get(url) => format!("GET {}", url.path()),
                Request::Submit(form) => format!("SUBMIT {}", form.action().path()),
            })
            .collect()
    }

    pub fn remaining(&self) -> usize {
        self.responses.len()
    }

    fn next_page(&mut self) -> Result<Page> {
        match self.responses.pop_front() {
            Some(Ok(page)) => Ok(page),
            Some(Err(msg)) => Err(anyhow!("{}", msg)),
            None => Err(anyhow!("No more scripted responses")),
        }
    }
}

impl Browse for ScriptedBrowser {
    fn get(&mut self, url: Url, _cnsl: &mut Console) -> Result<Page> {
        self.requests.push(Request::Get(url));
        self.next_page()
    }

    fn submit(&mut self, form: &Form, _cnsl: &mut Console) -> Result<Page> {
        self.requests.push(Request::Submit(form.clone()));
        self.next_page()
    }
}

pub fn test_config() -> Config {
    let mut conf = Config::default();
    conf.session_mut()
        .set_poll_interval(Duration::from_millis(0));
    conf
}
