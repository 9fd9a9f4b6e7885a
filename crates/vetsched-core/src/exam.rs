//! Exam results attached to completed exam appointments.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Rejection;

const MIN_EXAM_NAME_CHARS: usize = 3;
const MIN_SUMMARY_CHARS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamResult {
  pub exam_result_id: Uuid,
  pub appointment_id: Uuid,
  pub pet_id:         Uuid,
  pub client_id:      Uuid,
  pub exam_name:      String,
  pub result_date:    NaiveDate,
  pub summary:        String,
  pub attachment_url: Option<String>,
  pub created_at:     DateTime<Utc>,
}

/// What a caller supplies when attaching a result. Pet and client ids are
/// taken from the appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewExamResult {
  pub exam_name:      String,
  pub result_date:    NaiveDate,
  pub summary:        String,
  #[serde(default)]
  pub attachment_url: Option<String>,
}

impl NewExamResult {
  /// Field-level checks against the clinic's current date. An empty
  /// attachment URL counts as absent.
  pub fn validate(&self, today: NaiveDate) -> Result<(), Rejection> {
    if self.exam_name.trim().chars().count() < MIN_EXAM_NAME_CHARS {
      return Err(Rejection::InvalidExamResult(format!(
        "the exam name must have at least {MIN_EXAM_NAME_CHARS} characters."
      )));
    }
    if self.summary.trim().chars().count() < MIN_SUMMARY_CHARS {
      return Err(Rejection::InvalidExamResult(format!(
        "the result summary must have at least {MIN_SUMMARY_CHARS} characters."
      )));
    }
    if self.result_date > today {
      return Err(Rejection::InvalidExamResult(
        "the result date cannot be in the future.".to_owned(),
      ));
    }
    if let Some(url) = self.attachment_url.as_deref().map(str::trim)
      && !url.is_empty()
      && !looks_like_url(url)
    {
      return Err(Rejection::InvalidExamResult(
        "the attachment URL is not valid.".to_owned(),
      ));
    }
    Ok(())
  }

  /// Trim fields and drop an empty attachment URL.
  pub fn normalized(mut self) -> Self {
    self.exam_name = self.exam_name.trim().to_owned();
    self.summary = self.summary.trim().to_owned();
    self.attachment_url = self
      .attachment_url
      .map(|u| u.trim().to_owned())
      .filter(|u| !u.is_empty());
    self
  }
}

fn looks_like_url(s: &str) -> bool {
  let rest = s
    .strip_prefix("https://")
    .or_else(|| s.strip_prefix("http://"));
  matches!(rest, Some(host) if !host.is_empty() && !host.contains(char::is_whitespace))
}
