use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::client::{AdviceService, ClientError};
use crate::situation::{HandSituation, OpponentField, SituationField, format_situation};
use crate::wire::AdviceReply;

pub const NO_ADVICE_MESSAGE: &str = "No advice received.";
pub const FAILURE_MESSAGE: &str = "Failed to get advice. Please try again.";

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("required fields are empty: {}", .0.join(", "))]
    MissingFields(Vec<String>),
    #[error("opponent count must be between 1 and 5, got {0}")]
    OpponentCount(usize),
    #[error("opponent {index} does not exist ({len} opponents)")]
    OpponentIndex { index: usize, len: usize },
}

/// Outcome of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdviceResult {
    Advice(String),
    Failure(String),
}

impl AdviceResult {
    pub fn text(&self) -> &str {
        match self {
            AdviceResult::Advice(text) | AdviceResult::Failure(text) => text,
        }
    }

    pub fn from_reply(reply: Result<AdviceReply, ClientError>) -> Self {
        match reply {
            Ok(AdviceReply {
                advice: Some(advice),
                ..
            }) if !advice.is_empty() => AdviceResult::Advice(advice),
            Ok(reply) => {
                if let Some(error) = reply.error {
                    warn!(%error, "advice endpoint reported an error");
                }
                AdviceResult::Failure(NO_ADVICE_MESSAGE.to_string())
            }
            Err(err) => {
                warn!(error = %err, "advice request failed");
                AdviceResult::Failure(FAILURE_MESSAGE.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Loading,
    Success(String),
    Error(String),
}

impl SubmissionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SubmissionStatus::Success(_) | SubmissionStatus::Error(_))
    }
}

impl From<AdviceResult> for SubmissionStatus {
    fn from(result: AdviceResult) -> Self {
        match result {
            AdviceResult::Advice(text) => SubmissionStatus::Success(text),
            AdviceResult::Failure(text) => SubmissionStatus::Error(text),
        }
    }
}

/// A submission that has left the form and is waiting on the endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    pub ticket: u64,
    pub payload: String,
}

/// Form state plus the submission lifecycle.
///
/// Each submission takes a ticket from a monotonic counter. Only the
/// completion carrying the most recent ticket may change the status, so the
/// form always settles on the answer to the last submit regardless of the
/// order in which replies arrive.
#[derive(Debug, Default)]
pub struct AdviceForm {
    situation: HandSituation,
    status: SubmissionStatus,
    issued: u64,
}

pub type SharedForm = Arc<Mutex<AdviceForm>>;

impl AdviceForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(self) -> SharedForm {
        Arc::new(Mutex::new(self))
    }

    pub fn situation(&self) -> &HandSituation {
        &self.situation
    }

    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == SubmissionStatus::Loading
    }

    /// Text for the result panel; empty until a submission settles.
    pub fn advice_text(&self) -> &str {
        match &self.status {
            SubmissionStatus::Success(text) | SubmissionStatus::Error(text) => text,
            SubmissionStatus::Idle | SubmissionStatus::Loading => "",
        }
    }

    pub fn set_field(&mut self, field: SituationField, value: impl Into<String>) {
        self.situation.set_field(field, value);
    }

    pub fn set_preflop(&mut self, flag: bool) {
        self.situation.set_preflop(flag);
    }

    pub fn set_opponent_count(&mut self, count: usize) -> Result<(), FormError> {
        self.situation.set_opponent_count(count)
    }

    pub fn set_opponent_field(
        &mut self,
        index: usize,
        field: OpponentField,
        value: impl Into<String>,
    ) -> Result<(), FormError> {
        self.situation.set_opponent_field(index, field, value)
    }

    pub fn begin_submission(&mut self) -> Result<PendingSubmission, FormError> {
        let missing = self.situation.missing_fields();
        if !missing.is_empty() {
            return Err(FormError::MissingFields(missing));
        }

        self.issued += 1;
        self.status = SubmissionStatus::Loading;
        let payload = format_situation(&self.situation);
        debug!(ticket = self.issued, "submission started");
        Ok(PendingSubmission {
            ticket: self.issued,
            payload,
        })
    }

    /// Applies a finished submission. Returns `false` when a newer
    /// submission has been started since, in which case nothing changes.
    pub fn complete_submission(&mut self, ticket: u64, result: AdviceResult) -> bool {
        if ticket != self.issued {
            debug!(ticket, latest = self.issued, "dropping superseded advice");
            return false;
        }
        debug!(ticket, "submission settled");
        self.status = result.into();
        true
    }

    /// Closes the result panel.
    pub fn dismiss(&mut self) {
        if self.status.is_terminal() {
            self.status = SubmissionStatus::Idle;
        }
    }
}

/// Runs one submission against `service`. The lock is only held while the
/// form changes state, never across the network call.
pub async fn submit(
    form: &Mutex<AdviceForm>,
    service: &dyn AdviceService,
) -> Result<AdviceResult, FormError> {
    let pending = form.lock().begin_submission()?;
    let result = AdviceResult::from_reply(service.analyze(&pending.payload).await);
    form.lock().complete_submission(pending.ticket, result.clone());
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> AdviceForm {
        let mut form = AdviceForm::new();
        form.set_field(SituationField::PotSize, "12");
        form.set_field(SituationField::HandCards, "Ah Ad");
        form.set_field(SituationField::Position, "Small Blind");
        form.set_preflop(true);
        form.set_opponent_field(0, OpponentField::Bet, "3").unwrap();
        form.set_opponent_field(0, OpponentField::Position, "Button").unwrap();
        form
    }

    #[test]
    fn incomplete_form_stays_idle() {
        let mut form = AdviceForm::new();
        let err = form.begin_submission().unwrap_err();
        match err {
            FormError::MissingFields(fields) => {
                assert!(fields.contains(&"pot size".to_string()));
                assert!(fields.contains(&"opponent 1 position".to_string()));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(form.status(), &SubmissionStatus::Idle);
    }

    #[test]
    fn lifecycle_runs_idle_loading_success_idle() {
        let mut form = filled_form();
        let pending = form.begin_submission().unwrap();
        assert!(form.is_loading());
        assert!(pending.payload.contains("Community Cards: this is preflop"));
        assert_eq!(form.advice_text(), "");

        assert!(form.complete_submission(pending.ticket, AdviceResult::Advice("Raise.".into())));
        assert_eq!(form.status(), &SubmissionStatus::Success("Raise.".into()));
        assert_eq!(form.advice_text(), "Raise.");

        form.dismiss();
        assert_eq!(form.status(), &SubmissionStatus::Idle);
    }

    #[test]
    fn resubmitting_clears_previous_advice() {
        let mut form = filled_form();
        let first = form.begin_submission().unwrap();
        form.complete_submission(first.ticket, AdviceResult::Advice("Fold.".into()));

        form.begin_submission().unwrap();
        assert!(form.is_loading());
        assert_eq!(form.advice_text(), "");
    }

    #[test]
    fn stale_completion_is_ignored() {
        let mut form = filled_form();
        let first = form.begin_submission().unwrap();
        let second = form.begin_submission().unwrap();
        assert!(second.ticket > first.ticket);

        assert!(form.complete_submission(second.ticket, AdviceResult::Advice("Call.".into())));
        assert!(!form.complete_submission(
            first.ticket,
            AdviceResult::Failure(FAILURE_MESSAGE.into())
        ));
        assert_eq!(form.status(), &SubmissionStatus::Success("Call.".into()));
    }

    #[test]
    fn replies_map_to_user_visible_text() {
        let ok = AdviceResult::from_reply(Ok(AdviceReply {
            advice: Some("Check.".into()),
            error: None,
        }));
        assert_eq!(ok, AdviceResult::Advice("Check.".into()));

        let error_body = AdviceResult::from_reply(Ok(AdviceReply {
            advice: None,
            error: Some("Failed to get advice".into()),
        }));
        assert_eq!(error_body.text(), NO_ADVICE_MESSAGE);

        let empty = AdviceResult::from_reply(Ok(AdviceReply {
            advice: Some(String::new()),
            error: None,
        }));
        assert_eq!(empty.text(), NO_ADVICE_MESSAGE);

        let broken = AdviceResult::from_reply(Err(ClientError::Decode("eof".into())));
        assert_eq!(broken, AdviceResult::Failure(FAILURE_MESSAGE.into()));
    }
}
