use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use getset::Getters;
use maplit::btreemap;
use serde::{Deserialize, Serialize};

pub type LangName = String;

pub type LangNameRef<'a> = &'a str;

/// Language id understood by the judge, sent as the value of the `language` select.
pub type LangCode = String;

pub type LangCodeRef<'a> = &'a str;

macro_rules! def_string_id {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl<T: Into<String>> From<T> for $name {
            fn from(id: T) -> Self {
                Self(id.into())
            }
        }

        impl FromStr for $name {
            type Err = Infallible;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                Ok(Self::from(s))
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

def_string_id!(
    /// Code of a problem, such as `TEST` or `FLOW001`.
    QuestionCode
);

def_string_id!(
    /// Id the judge assigns to a submission.
    ///
    /// Taken verbatim from the url the judge redirects to after submitting,
    /// so it is not guaranteed to be numeric.
    SubmissionId
);

def_string_id!(
    /// Status token scraped from the status page, e.g. `RA`, `WA`, `CE`, `RE`.
    ///
    /// The set of values is decided by the judge, so this is kept as an open string.
    Verdict
);

impl Verdict {
    /// Returns false while the judge is still compiling or running the submission.
    pub fn is_terminal(&self) -> bool {
        !(self.0.contains("running") || self.0.contains("compiling"))
    }

    pub fn describe(&self) -> Option<&'static str> {
        match self.0.as_str() {
            "RA" => Some("right answer"),
            "WA" => Some("wrong answer"),
            "CE" => Some("compilation error"),
            "RE" => Some("runtime error"),
            _ => None,
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.0 == "RA"
    }
}

#[derive(Getters, Clone, PartialEq, Eq, Hash)]
#[get = "pub"]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

/// Mapping from language names to the codes the judge expects.
///
/// Entries can be added from the config file. They override the defaults of the same name.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct LangTable(BTreeMap<LangName, LangCode>);

impl LangTable {
    pub fn get(&self, lang_name: LangNameRef) -> Option<LangCodeRef> {
        self.0.get(lang_name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (LangNameRef<'_>, LangCodeRef<'_>)> + '_ {
        self.0
            .iter()
            .map(|(name, code)| (name.as_str(), code.as_str()))
    }
}

impl Default for LangTable {
    fn default() -> Self {
        let table = btreemap! {
            "cpp" => "44",
            "c" => "11",
            "c#" => "27",
            "java" => "10",
            "php" => "29",
            "python3" => "116",
            "python2" => "4",
        };
        Self(
            table
                .into_iter()
                .map(|(name, code)| (name.to_owned(), code.to_owned()))
                .collect(),
        )
    }
}

impl Extend<(LangName, LangCode)> for LangTable {
    fn extend<I: IntoIterator<Item = (LangName, LangCode)>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_is_terminal() {
        let tests = &[
            ("RA", true),
            ("WA", true),
            ("CE", true),
            ("RE", true),
            ("running", false),
            ("compiling", false),
            ("running..", false),
            ("now compiling", false),
            ("Running", true),
            ("", true),
        ];
        for &(token, expected) in tests {
            assert_eq!(Verdict::from(token).is_terminal(), expected, "{}", token);
        }
    }

    #[test]
    fn verdict_describe() {
        assert_eq!(Verdict::from("WA").describe(), Some("wrong answer"));
        assert_eq!(Verdict::from("TLE").describe(), None);
        assert!(Verdict::from("RA").is_accepted());
    }

    #[test]
    fn lang_table_default() {
        let table = LangTable::default();
        assert_eq!(table.get("cpp"), Some("44"));
        assert_eq!(table.get("c#"), Some("27"));
        assert_eq!(table.get("python2"), Some("4"));
        assert_eq!(table.get("cobol"), None);
        assert_eq!(table.iter().count(), 7);
    }

    #[test]
    fn lang_table_extend_overrides() {
        let mut table = LangTable::default();
        table.extend(vec![
            ("rust".to_owned(), "93".to_owned()),
            ("cpp".to_owned(), "63".to_owned()),
        ]);
        assert_eq!(table.get("rust"), Some("93"));
        assert_eq!(table.get("cpp"), Some("63"));
    }

    #[test]
    fn credentials_debug_hides_password() {
        let creds = Credentials::new("chef", "s3cret");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("chef"));
        assert!(!debug.contains("s3cret"));
    }
}
