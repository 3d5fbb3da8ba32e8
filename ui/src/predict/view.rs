use dioxus::prelude::*;

use api::PredictionResult;

use crate::core::platform::Platform;
use crate::core::settings::Settings;
use crate::core::transport;
use crate::t;

use super::handler::{PredictionSink, SubmitHandler};

/// What the page shows: the latest prediction and the confidence bar width.
///
/// Launchers create it with [`use_prediction_state`] above the
/// language-keyed subtree, so a locale switch neither resets the page nor
/// orphans the signals a pending submission writes to.
#[derive(Clone, Copy)]
pub struct PredictionState {
    result: Signal<Option<PredictionResult>>,
    bar_width: Signal<String>,
}

impl PredictionState {
    fn new() -> Self {
        Self {
            result: Signal::new(None),
            bar_width: Signal::new("0%".to_string()),
        }
    }
}

/// Provide the page state from the calling scope.
pub fn use_prediction_state() -> PredictionState {
    use_context_provider(PredictionState::new)
}

impl PredictionSink for PredictionState {
    fn show_result(&self, result: &PredictionResult) {
        let mut slot = self.result;
        slot.set(Some(result.clone()));
    }

    fn set_confidence_width(&self, width: &str) {
        let mut slot = self.bar_width;
        slot.set(width.to_string());
    }
}

/// Localized label/value pairs shown in the result container.
pub fn result_lines(result: &PredictionResult) -> [(String, String); 4] {
    [
        (t!("result-status"), result.status_text().to_string()),
        (t!("result-confidence"), result.confidence_text().to_string()),
        (t!("result-valid"), result.valid_text().to_string()),
        (t!("result-invalid"), result.invalid_text().to_string()),
    ]
}

#[component]
pub fn DefectForm() -> Element {
    let handler = use_hook(|| {
        let settings = Settings::load();
        let handler = SubmitHandler::new(transport::default_transport(), settings.predict_url());
        tracing::info!(
            platform = Platform::current().as_str(),
            url = handler.predict_url(),
            "prediction form ready"
        );
        handler
    });
    let state = use_hook(|| {
        try_consume_context::<PredictionState>().unwrap_or_else(|| {
            tracing::debug!("no PredictionState in context; state is local to the form");
            PredictionState::new()
        })
    });
    let mut summary = use_signal(String::new);

    let on_submit = move |evt: FormEvent| {
        let pending = handler.on_submit(&evt, summary(), state);
        // Root scope: a language remount drops this component, not the request.
        spawn_forever(async move {
            if let Err(err) = pending.await {
                tracing::error!(%err, "prediction request failed");
            }
        });
    };

    let latest = (state.result)();
    let bar_width = (state.bar_width)();

    rsx! {
        article { class: "predict",
            form {
                id: "defectForm",
                class: "predict__form",
                onsubmit: on_submit,

                label { class: "predict__label", r#for: "Summary", {t!("form-summary-label")} }
                textarea {
                    id: "Summary",
                    name: "Summary",
                    class: "predict__input",
                    rows: 4,
                    placeholder: t!("form-summary-placeholder"),
                    value: "{summary}",
                    oninput: move |evt| summary.set(evt.value()),
                }
                button {
                    r#type: "submit",
                    class: "button button--primary predict__submit",
                    {t!("form-submit")}
                }
            }

            div { class: "predict__confidence",
                span { class: "predict__confidence-label", {t!("confidence-bar-label")} }
                div {
                    class: "confidence-bar",
                    role: "progressbar",
                    aria_valuemin: "0",
                    aria_valuemax: "100",
                    div {
                        id: "confidenceBar",
                        class: "confidence-bar__fill",
                        style: "width: {bar_width}",
                    }
                }
            }

            div { id: "result", class: "predict__result",
                if let Some(prediction) = latest {
                    for (label, value) in result_lines(&prediction) {
                        p { class: "predict__line",
                            strong { "{label}" }
                            " {value}"
                        }
                    }
                } else {
                    p { class: "predict__placeholder", {t!("result-placeholder")} }
                }
            }
        }
    }
}
