//! The defect prediction form: submit handling and the page component.

mod handler;
mod view;

pub use handler::{PredictionSink, SubmitError, SubmitEvent, SubmitHandler};
pub use view::{result_lines, use_prediction_state, DefectForm, PredictionState};
