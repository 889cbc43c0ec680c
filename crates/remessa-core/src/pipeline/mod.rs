//! The delivery-state pipeline: classification, resend confirmation,
//! sequential dispatch and outcome reporting.

pub mod classify;
pub mod confirm;
pub mod deliver;
pub mod report;

pub use classify::{Classification, Classifier, Intake};
pub use confirm::{Answer, ConfirmPrompt, ConfirmationGate};
pub use deliver::Dispatcher;
pub use report::{RunOutcomes, render_summary};
