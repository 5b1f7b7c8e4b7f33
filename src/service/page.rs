use anyhow::Context as _;
use reqwest::{Method, Url};
use scraper::{ElementRef, Html};

use crate::service::Scrape as _;
use crate::{select, ClientError, Error, Result};

/// Page reached after a request, with redirects already followed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    url: Url,
    body: String,
}

impl Page {
    pub fn new(url: Url, body: impl Into<String>) -> Self {
        Self {
            url,
            body: body.into(),
        }
    }

    /// Final url of the page.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn count_forms(&self) -> usize {
        Html::parse_document(&self.body)
            .select(select!("form"))
            .count()
    }

    /// Returns the `nr`-th form on the page, in document order.
    pub fn form(&self, nr: usize) -> Result<Form> {
        let html = Html::parse_document(&self.body);
        let elem = html
            .select(select!("form"))
            .nth(nr)
            .ok_or_else(|| {
                ClientError::UnexpectedPage(format!("Could not find form #{} in {}", nr, self.url))
            })?;
        Form::parse(elem, &self.url)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FieldKind {
    Text,
    Select { options: Vec<String> },
    File,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Field {
    name: String,
    kind: FieldKind,
    values: Vec<String>,
}

impl Field {
    fn parse(elem: ElementRef) -> Option<Self> {
        let name = elem.attr("name")?.to_owned();
        match elem.value().name() {
            "input" => {
                let input_type = elem.attr("type").unwrap_or("text").to_lowercase();
                let values = match input_type.as_str() {
                    "submit" | "button" | "image" | "reset" => return None,
                    "file" => {
                        return Some(Self {
                            name,
                            kind: FieldKind::File,
                            values: Vec::new(),
                        })
                    }
                    "checkbox" | "radio" => {
                        elem.attr("checked")?;
                        vec![elem.attr("value").unwrap_or("on").to_owned()]
                    }
                    _ => vec![elem.attr("value").unwrap_or("").to_owned()],
                };
                Some(Self {
                    name,
                    kind: FieldKind::Text,
                    values,
                })
            }
            "textarea" => Some(Self {
                name,
                kind: FieldKind::Text,
                values: vec![elem.inner_text()],
            }),
            "select" => {
                let mut options = Vec::new();
                let mut selected = Vec::new();
                for opt in elem.select(select!("option")) {
                    let value = opt
                        .attr("value")
                        .map(str::to_owned)
                        .unwrap_or_else(|| opt.inner_text().trim().to_owned());
                    if opt.attr("selected").is_some() {
                        selected.push(value.clone());
                    }
                    options.push(value);
                }
                if selected.is_empty() && elem.attr("multiple").is_none() {
                    selected.extend(options.first().cloned());
                }
                Some(Self {
                    name,
                    kind: FieldKind::Select { options },
                    values: selected,
                })
            }
            _ => None,
        }
    }
}

/// Encoding of the data sent with a form.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Enctype {
    /// `application/x-www-form-urlencoded`
    UrlEncoded,
    /// `multipart/form-data`
    Multipart,
}

impl Enctype {
    fn parse(attr: Option<&str>) -> Self {
        match attr.map(str::trim) {
            Some(enctype) if enctype.eq_ignore_ascii_case("multipart/form-data") => {
                Self::Multipart
            }
            _ => Self::UrlEncoded,
        }
    }
}

/// Snapshot of a html form whose fields can be filled before submitting it.
///
/// File inputs are kept but never filled. They are sent as empty files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    action: Url,
    method: Method,
    enctype: Enctype,
    fields: Vec<Field>,
}

impl Form {
    fn parse(elem: ElementRef, page_url: &Url) -> Result<Self> {
        let action = match elem.attr("action").map(str::trim) {
            Some(action) if !action.is_empty() => page_url
                .join(action)
                .with_context(|| format!("Could not parse form action : {}", action))?,
            _ => page_url.clone(),
        };
        let method = match elem.attr("method") {
            Some(method) if method.eq_ignore_ascii_case("post") => Method::POST,
            _ => Method::GET,
        };
        let enctype = Enctype::parse(elem.attr("enctype"));
        let fields = elem
            .select(select!("input, textarea, select"))
            .filter_map(Field::parse)
            .collect();
        Ok(Self {
            action,
            method,
            enctype,
            fields,
        })
    }

    pub fn action(&self) -> &Url {
        &self.action
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn enctype(&self) -> Enctype {
        self.enctype
    }

    /// Names of the file inputs, in document order.
    pub fn file_fields(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields
            .iter()
            .filter(|field| field.kind == FieldKind::File)
            .map(|field| field.name.as_str())
    }

    /// Returns the first value of the named field.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.find_field(name)
            .and_then(|field| field.values.first())
            .map(String::as_str)
    }

    /// Sets the value of a text-like field (`input` or `textarea`).
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        let field = self.find_field_mut(name)?;
        match field.kind {
            FieldKind::Text => {
                field.values = vec![value.into()];
                Ok(())
            }
            FieldKind::Select { .. } => Err(ClientError::UnexpectedPage(format!(
                "Field {} is a select and needs a selection",
                name
            ))
            .into()),
            FieldKind::File => Err(ClientError::UnexpectedPage(format!(
                "Field {} is a file input",
                name
            ))
            .into()),
        }
    }

    /// Replaces the selected options of a `select` field.
    pub fn set_selection(&mut self, name: &str, values: &[&str]) -> Result<()> {
        let field = self.find_field_mut(name)?;
        match &field.kind {
            FieldKind::Select { options } => {
                let missing = values
                    .iter()
                    .find(|&&val| !options.iter().any(|opt| opt == val));
                if let Some(missing) = missing {
                    return Err(ClientError::UnexpectedPage(format!(
                        "Could not find option {} in field {}",
                        missing, name
                    ))
                    .into());
                }
                field.values = values.iter().map(|&val| val.to_owned()).collect();
                Ok(())
            }
            FieldKind::Text | FieldKind::File => Err(ClientError::UnexpectedPage(format!(
                "Field {} is not a select",
                name
            ))
            .into()),
        }
    }

    /// Name-value pairs sent when the form is submitted. File inputs are not included.
    pub fn to_pairs(&self) -> Vec<(&str, &str)> {
        self.fields
            .iter()
            .flat_map(|field| {
                field
                    .values
                    .iter()
                    .map(move |val| (field.name.as_str(), val.as_str()))
            })
            .collect()
    }

    fn find_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    fn find_field_mut(&mut self, name: &str) -> Result<&mut Field> {
        self.fields
            .iter_mut()
            .find(|field| field.name == name)
            .ok_or_else(|| {
                Error::new(ClientError::UnexpectedPage(format!(
                    "Could not find field {} in form",
                    name
                )))
            })
    }
}
