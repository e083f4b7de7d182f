// Queue payload parsing
use crate::model::{Job, JobError};

pub trait Parser {
    fn parse(&self, payload: &str) -> Result<Job, JobError>;
}

pub struct JobParser;

impl JobParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JobParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for JobParser {
    fn parse(&self, payload: &str) -> Result<Job, JobError> {
        let value: serde_json::Value = serde_json::from_str(payload)?;

        let keyword = match value.get("keyword") {
            Some(serde_json::Value::String(s)) => s.trim().to_string(),
            _ => return Err(JobError::MissingKeyword),
        };
        if keyword.is_empty() {
            return Err(JobError::MissingKeyword);
        }

        Ok(Job { keyword })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_trims_keyword() {
        let job = JobParser::new().parse(r#"{"keyword": "  winter coat "}"#).unwrap();
        assert_eq!(job.keyword, "winter coat");
    }

    #[test]
    fn ignores_unknown_fields() {
        let job = JobParser::new()
            .parse(r#"{"keyword": "손난로", "requestedBy": "web"}"#)
            .unwrap();
        assert_eq!(job.keyword, "손난로");
    }

    #[test]
    fn rejects_non_json() {
        let err = JobParser::new().parse("keyword=coat").unwrap_err();
        assert!(matches!(err, JobError::Malformed(_)));
    }

    #[test]
    fn rejects_truncated_json() {
        let err = JobParser::new().parse(r#"{"keyword": "coat""#).unwrap_err();
        assert!(matches!(err, JobError::Malformed(_)));
    }

    #[test]
    fn rejects_missing_blank_or_non_string_keyword() {
        for payload in [r#"{}"#, r#"["coat"]"#, r#"{"keyword": "   "}"#, r#"{"keyword": null}"#, r#"{"keyword": 7}"#] {
            let err = JobParser::new().parse(payload).unwrap_err();
            assert!(matches!(err, JobError::MissingKeyword), "payload {payload}");
        }
    }
}
