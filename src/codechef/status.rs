use crate::model::{SubmissionId, Verdict};
use crate::{ClientError, Result};

/// Scrapes the verdict of a submission out of the raw html of a status page.
///
/// The status page is not parsed as a document. The token is found by scanning text:
/// starting at the first occurrence of the submission id, skip to the first `span`,
/// then to the first `=` after it, skip that `=` and the quote following it,
/// and take everything up to the next `'`.
pub fn extract_verdict(html: &str, submission_id: &SubmissionId) -> Result<Verdict> {
    let not_found = || ClientError::VerdictNotFound(submission_id.clone());

    let start = html.find(submission_id.as_str()).ok_or_else(not_found)?;
    let rest = &html[start..];
    let rest = &rest[rest.find("span").ok_or_else(not_found)?..];
    let rest = &rest[rest.find('=').ok_or_else(not_found)? + 1..];
    let mut chars = rest.chars();
    chars.next().ok_or_else(not_found)?;
    let rest = chars.as_str();
    let end = rest.find('\'').ok_or_else(not_found)?;
    Ok(Verdict::from(&rest[..end]))
}
