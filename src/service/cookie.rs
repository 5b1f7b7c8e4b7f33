use std::convert::TryFrom as _;

use cookie::Cookie as RawCookie;
use cookie_store::CookieStore;
use reqwest::blocking::{Request, Response};
use reqwest::header::{HeaderValue, COOKIE, SET_COOKIE};

use crate::Result;

/// Cookie jar of one browser. Lives only as long as the browser; nothing is written to disk.
#[derive(Debug, Default)]
pub struct CookieStorage {
    store: CookieStore,
}

impl CookieStorage {
    pub fn load_into(&self, request: &mut Request) -> Result<()> {
        let url = request.url();
        let cookies = self
            .store
            .get_request_cookies(url)
            .map(|rc| format!("{}={}", rc.name(), rc.value()))
            .collect::<Vec<_>>();
        if !cookies.is_empty() {
            request
                .headers_mut()
                .insert(COOKIE, HeaderValue::try_from(cookies.join("; "))?);
        }
        Ok(())
    }

    pub fn store_from(&mut self, response: &Response) {
        let cookies = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|val| {
                val.to_str()
                    .ok()
                    .and_then(|cookie_str| RawCookie::parse(cookie_str.to_owned()).ok())
            });
        let url = response.url();
        self.store.store_response_cookies(cookies, url);
    }
}
