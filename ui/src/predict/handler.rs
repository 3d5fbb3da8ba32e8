//! Submit handling for the defect form: one POST per submit, rendered into
//! whatever sink the caller provides.

use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;

use api::PredictionResult;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::transport::{PredictTransport, TransportError};

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Api(#[from] api::ApiError),
}

/// The submit event of the form. Only its default action matters here.
pub trait SubmitEvent {
    fn prevent_default(&self);
}

impl SubmitEvent for dioxus::events::FormEvent {
    fn prevent_default(&self) {
        dioxus::prelude::Event::prevent_default(self);
    }
}

/// Destination for a completed prediction (the result container and the
/// confidence bar).
pub trait PredictionSink {
    /// Replace the result container with this prediction.
    fn show_result(&self, result: &PredictionResult);
    /// Set the confidence bar width, e.g. `"82.3%"`.
    fn set_confidence_width(&self, width: &str);
}

impl<T: PredictionSink + ?Sized> PredictionSink for Rc<T> {
    fn show_result(&self, result: &PredictionResult) {
        (**self).show_result(result);
    }

    fn set_confidence_width(&self, width: &str) {
        (**self).set_confidence_width(width);
    }
}

/// Sends form submissions to the predict endpoint.
///
/// Submissions are independent: nothing is cancelled or serialised, so when
/// two requests overlap the one that resolves last writes the final state.
#[derive(Clone)]
pub struct SubmitHandler {
    transport: Rc<dyn PredictTransport>,
    predict_url: Rc<str>,
    next_seq: Rc<Cell<u64>>,
}

impl SubmitHandler {
    pub fn new(transport: Rc<dyn PredictTransport>, predict_url: impl Into<String>) -> Self {
        Self {
            transport,
            predict_url: Rc::from(predict_url.into()),
            next_seq: Rc::new(Cell::new(1)),
        }
    }

    pub fn predict_url(&self) -> &str {
        &self.predict_url
    }

    /// Handle a submit event.
    ///
    /// The default action is prevented before this returns, whatever the
    /// request later does. The returned future performs the request.
    pub fn on_submit<S>(
        &self,
        event: &dyn SubmitEvent,
        summary: String,
        sink: S,
    ) -> impl Future<Output = Result<PredictionResult, SubmitError>> + 'static
    where
        S: PredictionSink + 'static,
    {
        event.prevent_default();
        let handler = self.clone();
        async move { handler.submit(&summary, &sink).await }
    }

    /// POST `summary`, then render the decoded prediction into `sink`.
    ///
    /// On transport or decode errors the sink is left untouched. A confidence
    /// that cannot size the bar still renders the result lines; only the bar
    /// keeps its previous width.
    pub async fn submit<S>(
        &self,
        summary: &str,
        sink: &S,
    ) -> Result<PredictionResult, SubmitError>
    where
        S: PredictionSink + ?Sized,
    {
        let seq = self.next_seq.get();
        self.next_seq.set(seq.wrapping_add(1));

        let body = api::encode_summary(summary);
        debug!(
            seq,
            url = %self.predict_url,
            chars = summary.chars().count(),
            "posting summary"
        );

        let raw = self.transport.post_form(&self.predict_url, body).await?;
        let result = PredictionResult::from_json(&raw)?;

        sink.show_result(&result);
        match result.confidence_percent() {
            Ok(percent) => sink.set_confidence_width(&api::bar_width(percent)),
            Err(err) => warn!(seq, %err, "confidence bar left unchanged"),
        }

        info!(
            seq,
            status = result.status_text(),
            confidence = result.confidence_text(),
            "prediction rendered"
        );
        Ok(result)
    }
}
