//! Submitted questionnaire forms.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ReportError;

/// A raw answer as submitted: either a number or free text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// A numeric answer.
    Number(f64),
    /// A textual answer; numeric strings (with `.` or `,` decimals) are accepted.
    Text(String),
}

impl AnswerValue {
    /// Interprets the answer as a number, if possible.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value).filter(|value| value.is_finite()),
            Self::Text(text) => text
                .trim()
                .replace(',', ".")
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite()),
        }
    }
}

impl From<f64> for AnswerValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for AnswerValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// Answers of one form, keyed by question id.
pub type AnswerMap = BTreeMap<String, AnswerValue>;

/// One submitted form: a free-form identifier naming the factor, plus answers.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FormSubmission {
    /// Identifier of the form, e.g. `"neuroticismo-v1"`.
    #[serde(alias = "formIdentifier", alias = "formId", alias = "form")]
    pub identifier: String,
    /// Raw answers keyed by question id.
    #[serde(default)]
    pub answers: AnswerMap,
}

impl FormSubmission {
    /// Creates a submission without answers.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            answers: AnswerMap::new(),
        }
    }

    /// Adds an answer and returns the updated submission.
    pub fn with_answer(mut self, question_id: impl Into<String>, value: impl Into<AnswerValue>) -> Self {
        self.answers.insert(question_id.into(), value.into());
        self
    }

    /// Extends the submission with several answers.
    pub fn with_answers<I, K, V>(mut self, answers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AnswerValue>,
    {
        self.answers
            .extend(answers.into_iter().map(|(key, value)| (key.into(), value.into())));
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Submissions {
    Many(Vec<FormSubmission>),
    One(FormSubmission),
}

/// Parses a forms payload: a single form object or a list of them.
pub fn parse_submissions(json: &str) -> Result<Vec<FormSubmission>, ReportError> {
    Ok(match serde_json::from_str(json)? {
        Submissions::Many(forms) => forms,
        Submissions::One(form) => vec![form],
    })
}

/// Reads and parses a forms payload from disk.
pub fn load_submissions(path: impl AsRef<Path>) -> Result<Vec<FormSubmission>, ReportError> {
    let json = std::fs::read_to_string(path)?;
    parse_submissions(&json)
}
