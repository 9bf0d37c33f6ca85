pub mod client;
pub mod completion;
pub mod config;
pub mod form;
pub mod situation;
pub mod web;
pub mod wire;

pub use client::{AdviceService, HttpAdviceService};
pub use completion::{CompletionApi, OpenAiClient};
pub use form::{AdviceForm, AdviceResult, FormError, SubmissionStatus};
pub use situation::{HandSituation, Opponent, format_situation};
