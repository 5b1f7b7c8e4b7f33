use std::io::Write as _;

use anyhow::{anyhow, Context as _};
use reqwest::blocking::{multipart, Client, RequestBuilder, Response};
use reqwest::redirect::Policy;
use reqwest::{Method, StatusCode, Url};

use crate::config::SessionConfig;
use crate::service::{Browse, CookieStorage, Enctype, Form, Page, ResponseExt as _};
use crate::{Console, Error, Result};

static USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "-", env!("CARGO_PKG_VERSION"));

/// [`Browse`] implementation backed by a blocking reqwest client.
///
/// Redirects are followed manually so that cookies set on intermediate responses are kept.
/// robots.txt is never consulted.
#[derive(Debug)]
pub struct Browser {
    client: Client,
    cookies: CookieStorage,
}

impl Browser {
    const MAX_REDIRECTS: usize = 10;

    pub fn new(session: &SessionConfig) -> Result<Self> {
        let client = Client::builder()
            .referer(false)
            .redirect(Policy::none()) // redirects manually
            .user_agent(USER_AGENT)
            .timeout(Some(session.timeout()))
            .build()
            .context("Could not setup http client")?;
        Ok(Self {
            client,
            cookies: CookieStorage::default(),
        })
    }

    fn send_pretty(&mut self, builder: RequestBuilder, cnsl: &mut Console) -> Result<Response> {
        let mut req = builder.build().context("Could not build request")?;
        self.cookies
            .load_into(&mut req)
            .context("Could not load cookies into request")?;
        write!(cnsl, "{:7} {} ... ", req.method().as_str(), req.url()).unwrap_or(());
        let result = self.client.execute(req).context("Could not send request");
        match &result {
            Ok(res) => writeln!(cnsl, "{}", res.status()),
            Err(_) => writeln!(cnsl, "failed"),
        }
        .unwrap_or(());
        let res = result?;
        self.cookies.store_from(&res);
        Ok(res)
    }

    fn send_following(&mut self, builder: RequestBuilder, cnsl: &mut Console) -> Result<Page> {
        let mut res = self.send_pretty(builder, cnsl)?;
        let mut n_redirects = 0;
        loop {
            let status = res.status();
            if status.is_success() {
                let url = res.url().clone();
                let body = res.text().context("Could not read response body")?;
                return Ok(Page::new(url, body));
            }
            if !status.is_redirection() || status == StatusCode::NOT_MODIFIED {
                return Err(anyhow!("Received invalid response : {}", status));
            }
            if n_redirects >= Self::MAX_REDIRECTS {
                return Err(Error::msg("Too many redirects"));
            }
            n_redirects += 1;
            let next_url = res.location_url(res.url())?;
            res = self.send_pretty(self.client.get(next_url), cnsl)?;
        }
    }

    fn build_submit(&self, form: &Form) -> RequestBuilder {
        let pairs = form.to_pairs();
        if *form.method() != Method::POST {
            return self.client.get(form.action().clone()).query(&pairs);
        }
        let builder = self.client.post(form.action().clone());
        match form.enctype() {
            Enctype::UrlEncoded => builder.form(&pairs),
            Enctype::Multipart => {
                let mut body = multipart::Form::new();
                for (name, value) in pairs {
                    body = body.text(name.to_owned(), value.to_owned());
                }
                for name in form.file_fields() {
                    let part = multipart::Part::bytes(Vec::<u8>::new()).file_name("");
                    body = body.part(name.to_owned(), part);
                }
                builder.multipart(body)
            }
        }
    }
}

impl Browse for Browser {
    fn get(&mut self, url: Url, cnsl: &mut Console) -> Result<Page> {
        let builder = self.client.get(url);
        self.send_following(builder, cnsl)
    }

    fn submit(&mut self, form: &Form, cnsl: &mut Console) -> Result<Page> {
        let builder = self.build_submit(form);
        self.send_following(builder, cnsl)
    }
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead as _, BufReader, Read as _, Write as _};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    use ntest::timeout;
    use reqwest::header::CONTENT_TYPE;

    use super::*;

    static FORMS_HTML: &str = r#"
<form action="/search"><input name="q" value="chef"></form>
<form action="/login" method="post">
  <input name="name" value="chef">
</form>
<form action="/submit/TEST" method="post" enctype="multipart/form-data">
  <textarea name="program">int main() {}</textarea>
  <input type="file" name="sourcefile">
</form>
"#;

    fn form(nr: usize) -> Form {
        let url = Url::parse("http://localhost/").unwrap();
        Page::new(url, FORMS_HTML).form(nr).unwrap()
    }

    fn redirect(to: &str) -> String {
        format!(
            "HTTP/1.1 302 Found\r\nLocation: {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            to
        )
    }

    fn ok(body: &str) -> String {
        format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        )
    }

    /// Answers one connection per response, in order, and returns the lowercased request heads.
    fn serve(responses: Vec<String>) -> (Url, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = Url::parse(&format!("http://{}/", listener.local_addr().unwrap())).unwrap();
        let handle = thread::spawn(move || {
            let mut heads = Vec::new();
            for response in responses {
                let (mut stream, _) = listener.accept().unwrap();
                let mut reader = BufReader::new(stream.try_clone().unwrap());
                let mut head = String::new();
                let mut content_length = 0;
                loop {
                    let mut line = String::new();
                    reader.read_line(&mut line).unwrap();
                    if line.trim().is_empty() {
                        break;
                    }
                    let line = line.to_lowercase();
                    if let Some(len) = line.strip_prefix("content-length:") {
                        content_length = len.trim().parse().unwrap();
                    }
                    head.push_str(&line);
                }
                let mut body = vec![0; content_length];
                reader.read_exact(&mut body).unwrap();
                stream.write_all(response.as_bytes()).unwrap();
                heads.push(head);
            }
            heads
        });
        (url, handle)
    }

    fn content_type(builder: RequestBuilder) -> String {
        let req = builder.build().unwrap();
        req.headers()[CONTENT_TYPE].to_str().unwrap().to_owned()
    }

    #[test]
    fn test_build_submit_encoding() -> anyhow::Result<()> {
        let browser = Browser::new(&SessionConfig::default())?;

        let req = browser.build_submit(&form(0)).build()?;
        assert_eq!(req.method(), &Method::GET);
        assert_eq!(req.url().as_str(), "http://localhost/search?q=chef");

        let content = content_type(browser.build_submit(&form(1)));
        assert_eq!(content, "application/x-www-form-urlencoded");

        let content = content_type(browser.build_submit(&form(2)));
        assert!(content.starts_with("multipart/form-data; boundary="), "{}", content);
        Ok(())
    }

    #[test]
    #[timeout(10000)]
    fn test_submit_multipart() {
        let (url, handle) = serve(vec![ok("submitted")]);
        let action = url.join("/submit/TEST").unwrap();
        let html = FORMS_HTML.replace("/submit/TEST", action.as_str());
        let mut form = Page::new(url, html).form(2).unwrap();
        form.set_value("program", "print(1)").unwrap();

        let mut browser = Browser::new(&SessionConfig::default()).unwrap();
        let page = browser.submit(&form, &mut Console::sink()).unwrap();
        assert_eq!(page.body(), "submitted");

        let heads = handle.join().unwrap();
        assert!(heads[0].starts_with("post /submit/test "), "{}", heads[0]);
        assert!(
            heads[0].contains("content-type: multipart/form-data; boundary="),
            "{}",
            heads[0]
        );
    }

    #[test]
    #[timeout(10000)]
    fn test_get_follows_max_redirects() {
        let mut responses = (1..=Browser::MAX_REDIRECTS)
            .map(|i| redirect(&format!("/r{}", i)))
            .collect::<Vec<_>>();
        responses.push(ok("done"));
        let (url, handle) = serve(responses);

        let mut browser = Browser::new(&SessionConfig::default()).unwrap();
        let page = browser.get(url, &mut Console::sink()).unwrap();
        assert_eq!(page.body(), "done");
        assert_eq!(page.url().path(), "/r10");
        assert_eq!(handle.join().unwrap().len(), Browser::MAX_REDIRECTS + 1);
    }

    #[test]
    #[timeout(10000)]
    fn test_get_too_many_redirects() {
        let responses = (1..=Browser::MAX_REDIRECTS + 1)
            .map(|i| redirect(&format!("/r{}", i)))
            .collect::<Vec<_>>();
        let (url, handle) = serve(responses);

        let mut browser = Browser::new(&SessionConfig::default()).unwrap();
        let err = browser.get(url, &mut Console::sink()).unwrap_err();
        assert_eq!(err.to_string(), "Too many redirects");
        assert_eq!(handle.join().unwrap().len(), Browser::MAX_REDIRECTS + 1);
    }

    #[test]
    #[timeout(10000)]
    fn test_get_invalid_status() {
        let response =
            "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";
        let (url, handle) = serve(vec![response.to_owned()]);

        let mut browser = Browser::new(&SessionConfig::default()).unwrap();
        let err = browser.get(url, &mut Console::sink()).unwrap_err();
        assert!(err.to_string().contains("500"), "{}", err);
        handle.join().unwrap();
    }
}
