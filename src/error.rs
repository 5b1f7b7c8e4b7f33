use std::fmt;

use crate::model::{LangName, SubmissionId, Verdict};

/// Failures a caller of [`Client`](crate::Client) may want to tell apart.
///
/// Operations return [`anyhow::Error`]; the kind is recovered with
/// `err.downcast_ref::<ClientError>()`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClientError {
    AlreadyLoggedIn,
    RequiresLogin,
    IncorrectLanguage(LangName),
    ConnectionFailed,
    UnexpectedPage(String),
    VerdictNotFound(SubmissionId),
    StillJudging(Verdict),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::AlreadyLoggedIn => f.write_str("Already logged in. Log out first."),
            Self::RequiresLogin => f.write_str("Requires login"),
            Self::IncorrectLanguage(lang_name) => {
                write!(f, "Could not find language in language table : {}", lang_name)
            }
            Self::ConnectionFailed => f.write_str("Could not connect to the server"),
            Self::UnexpectedPage(msg) => write!(f, "Received unexpected page : {}", msg),
            Self::VerdictNotFound(submission_id) => write!(
                f,
                "Could not find verdict of submission {} in status page",
                submission_id
            ),
            Self::StillJudging(verdict) => write!(
                f,
                "Gave up waiting for the verdict. Last status was : {}",
                verdict
            ),
        }
    }
}

impl std::error::Error for ClientError {}

#[cfg(test)]
mod tests {
    use anyhow::Context as _;

    use super::*;
    use crate::Result;

    #[test]
    fn test_downcast_from_context() {
        let result: Result<()> = Err(crate::Error::msg("connection reset by peer"))
            .context(ClientError::ConnectionFailed);
        let err = result.unwrap_err();
        assert_eq!(
            err.downcast_ref::<ClientError>(),
            Some(&ClientError::ConnectionFailed)
        );
        assert_eq!(err.root_cause().to_string(), "connection reset by peer");
    }

    #[test]
    fn test_display() {
        let err = ClientError::IncorrectLanguage("cobol".into());
        assert_eq!(
            err.to_string(),
            "Could not find language in language table : cobol"
        );
    }
}
