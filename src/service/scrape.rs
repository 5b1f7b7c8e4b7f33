use scraper::ElementRef;

pub trait Scrape {
    fn elem(&self) -> ElementRef;

    fn inner_text(&self) -> String {
        self.elem().text().fold(String::new(), |mut ret, s| {
            ret.push_str(s);
            ret
        })
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.elem().value().attr(name)
    }
}

impl Scrape for ElementRef<'_> {
    fn elem(&self) -> ElementRef {
        *self
    }
}
