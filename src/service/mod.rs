//! Http client with just enough form handling to drive server rendered pages.

use anyhow::Context as _;
use reqwest::blocking::Response;
use reqwest::header::LOCATION;
use reqwest::Url;

use crate::{Console, Result};

mod browser;
mod cookie;
mod page;
mod scrape;

pub use self::browser::Browser;
pub use self::cookie::CookieStorage;
pub use self::page::{Enctype, Form, Page};
pub use self::scrape::Scrape;

/// Navigation primitives the client is built on.
///
/// Both methods return the page reached after following redirects.
/// Any transport failure or unsuccessful http status is an error.
pub trait Browse {
    fn get(&mut self, url: Url, cnsl: &mut Console) -> Result<Page>;

    fn submit(&mut self, form: &Form, cnsl: &mut Console) -> Result<Page>;
}

impl<B: Browse + ?Sized> Browse for &mut B {
    fn get(&mut self, url: Url, cnsl: &mut Console) -> Result<Page> {
        (**self).get(url, cnsl)
    }

    fn submit(&mut self, form: &Form, cnsl: &mut Console) -> Result<Page> {
        (**self).submit(form, cnsl)
    }
}

pub trait ResponseExt {
    fn location_url(&self, base: &Url) -> Result<Url>;
}

impl ResponseExt for Response {
    fn location_url(&self, base: &Url) -> Result<Url> {
        let loc_str = self
            .headers()
            .get(LOCATION)
            .context("Could not find location header in response")?
            .to_str()?;
        base.join(loc_str)
            .context("Could not parse redirection url")
    }
}
