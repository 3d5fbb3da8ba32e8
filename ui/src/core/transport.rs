//! HTTP transports for the predict endpoint.
//!
//! The web build goes through the browser's `fetch`; desktop builds use a
//! shared blocking agent parked on a tokio blocking thread. Both only know how
//! to POST a form body and hand back the response text; decoding stays with
//! the caller.

use std::rc::Rc;

use futures_util::future::LocalBoxFuture;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("prediction service answered HTTP {0}")]
    Status(u16),
    #[error("failed to read response body: {0}")]
    Body(String),
    #[error("response exceeded {0} bytes")]
    TooLarge(usize),
}

/// Something that can POST a form body and return the response text.
pub trait PredictTransport {
    fn post_form(
        &self,
        url: &str,
        body: String,
    ) -> LocalBoxFuture<'_, Result<String, TransportError>>;
}

/// Transport for the platform this build targets.
pub fn default_transport() -> Rc<dyn PredictTransport> {
    #[cfg(target_arch = "wasm32")]
    {
        Rc::new(FetchTransport)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Rc::new(HttpAgentTransport::default())
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::FetchTransport;

#[cfg(not(target_arch = "wasm32"))]
pub use native::HttpAgentTransport;

#[cfg(target_arch = "wasm32")]
mod web {
    use futures_util::future::{FutureExt, LocalBoxFuture};
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Headers, Request, RequestInit, Response};

    use super::{PredictTransport, TransportError};

    /// `window.fetch` based transport.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct FetchTransport;

    impl PredictTransport for FetchTransport {
        fn post_form(
            &self,
            url: &str,
            body: String,
        ) -> LocalBoxFuture<'_, Result<String, TransportError>> {
            let url = url.to_string();
            async move { fetch_form(&url, &body).await }.boxed_local()
        }
    }

    async fn fetch_form(url: &str, body: &str) -> Result<String, TransportError> {
        let window = web_sys::window()
            .ok_or_else(|| TransportError::Network("no window available".to_string()))?;

        let headers = Headers::new().map_err(js_network)?;
        headers
            .set("Content-Type", api::FORM_CONTENT_TYPE)
            .map_err(js_network)?;

        let init = RequestInit::new();
        init.set_method("POST");
        init.set_headers(&headers);
        init.set_body(&JsValue::from_str(body));

        let request = Request::new_with_str_and_init(url, &init).map_err(js_network)?;
        let response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(js_network)?;
        let response: Response = response.dyn_into().map_err(js_network)?;

        if !response.ok() {
            return Err(TransportError::Status(response.status()));
        }

        let text_promise = response.text().map_err(js_body)?;
        let text = JsFuture::from(text_promise).await.map_err(js_body)?;
        text.as_string()
            .ok_or_else(|| TransportError::Body("response body is not text".to_string()))
    }

    fn js_network(err: JsValue) -> TransportError {
        TransportError::Network(format!("{err:?}"))
    }

    fn js_body(err: JsValue) -> TransportError {
        TransportError::Body(format!("{err:?}"))
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::io::Read;
    use std::sync::OnceLock;
    use std::time::Duration;

    use futures_util::future::{FutureExt, LocalBoxFuture};

    use super::{PredictTransport, TransportError};

    const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
    const READ_TIMEOUT: Duration = Duration::from_secs(30);
    const WRITE_TIMEOUT: Duration = Duration::from_secs(30);

    /// Prediction responses are a few hundred bytes; anything far beyond that
    /// is not a prediction.
    pub const MAX_RESPONSE_BYTES: usize = 64 * 1024;

    fn agent() -> &'static ureq::Agent {
        static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
        AGENT.get_or_init(|| {
            ureq::AgentBuilder::new()
                .timeout_connect(CONNECT_TIMEOUT)
                .timeout_read(READ_TIMEOUT)
                .timeout_write(WRITE_TIMEOUT)
                .build()
        })
    }

    /// Blocking `ureq` transport for desktop builds.
    #[derive(Debug, Clone, Copy)]
    pub struct HttpAgentTransport {
        max_response_bytes: usize,
    }

    impl Default for HttpAgentTransport {
        fn default() -> Self {
            Self {
                max_response_bytes: MAX_RESPONSE_BYTES,
            }
        }
    }

    impl HttpAgentTransport {
        pub fn with_max_response_bytes(max_response_bytes: usize) -> Self {
            Self { max_response_bytes }
        }

        /// POST `body` to `url` on the calling thread.
        pub fn post_blocking(&self, url: &str, body: &str) -> Result<String, TransportError> {
            let response = match agent()
                .post(url)
                .set("Content-Type", api::FORM_CONTENT_TYPE)
                .send_string(body)
            {
                Ok(response) => response,
                Err(ureq::Error::Status(code, _)) => return Err(TransportError::Status(code)),
                Err(err) => return Err(TransportError::Network(err.to_string())),
            };
            read_limited(response, self.max_response_bytes)
        }
    }

    impl PredictTransport for HttpAgentTransport {
        fn post_form(
            &self,
            url: &str,
            body: String,
        ) -> LocalBoxFuture<'_, Result<String, TransportError>> {
            let transport = *self;
            let url = url.to_string();
            async move {
                tokio::task::spawn_blocking(move || transport.post_blocking(&url, &body))
                    .await
                    .map_err(|err| TransportError::Network(format!("request task failed: {err}")))?
            }
            .boxed_local()
        }
    }

    fn read_limited(response: ureq::Response, max_bytes: usize) -> Result<String, TransportError> {
        let mut limited = response.into_reader().take(max_bytes as u64 + 1);
        let mut bytes = Vec::new();
        limited
            .read_to_end(&mut bytes)
            .map_err(|err| TransportError::Body(err.to_string()))?;
        if bytes.len() > max_bytes {
            return Err(TransportError::TooLarge(max_bytes));
        }
        String::from_utf8(bytes).map_err(|err| TransportError::Body(err.to_string()))
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::io::Write;
        use std::net::TcpListener;
        use std::sync::mpsc;
        use std::thread;

        /// Serve one canned response and report the raw request that was read.
        fn serve_once(response: String) -> (String, mpsc::Receiver<String>) {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            let addr = listener.local_addr().unwrap();
            let (tx, rx) = mpsc::channel();
            thread::spawn(move || {
                if let Ok((mut stream, _)) = listener.accept() {
                    stream
                        .set_read_timeout(Some(Duration::from_millis(500)))
                        .unwrap();
                    let mut request = Vec::new();
                    let mut buf = [0u8; 1024];
                    while let Ok(read) = stream.read(&mut buf) {
                        if read == 0 {
                            break;
                        }
                        request.extend_from_slice(&buf[..read]);
                        if request_complete(&request) {
                            break;
                        }
                    }
                    let _ = tx.send(String::from_utf8_lossy(&request).into_owned());
                    let _ = stream.write_all(response.as_bytes());
                }
            });
            (format!("http://{addr}/predict"), rx)
        }

        fn request_complete(raw: &[u8]) -> bool {
            let text = String::from_utf8_lossy(raw);
            let Some((head, body)) = text.split_once("\r\n\r\n") else {
                return false;
            };
            let length = head
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            body.len() >= length
        }

        fn ok_response(body: &str) -> String {
            format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
                body.len(),
                body
            )
        }

        #[test]
        fn posts_form_body_and_returns_text() {
            let json = r#"{"Status":"Valid","Confidence":"91.20%"}"#;
            let (url, request_rx) = serve_once(ok_response(json));

            let text = HttpAgentTransport::default()
                .post_blocking(&url, "Summary=crash+on+start")
                .unwrap();
            assert_eq!(text, json);

            let request = request_rx.recv().unwrap();
            assert!(request.starts_with("POST /predict HTTP/1.1"));
            assert!(request
                .to_ascii_lowercase()
                .contains("content-type: application/x-www-form-urlencoded"));
            assert!(request.ends_with("Summary=crash+on+start"));
        }

        #[test]
        fn post_form_runs_request_on_blocking_pool() {
            let json = r#"{"Status":"Invalid","Confidence":"64.00%"}"#;
            let (url, request_rx) = serve_once(ok_response(json));
            let runtime = tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap();

            let transport = HttpAgentTransport::default();
            let text = runtime
                .block_on(transport.post_form(&url, "Summary=slow+export".to_string()))
                .unwrap();
            assert_eq!(text, json);
            assert!(request_rx.recv().unwrap().ends_with("Summary=slow+export"));
        }

        #[test]
        fn post_form_reports_status_errors() {
            let (url, _rx) = serve_once(
                "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\n\r\n".to_string(),
            );
            let runtime = tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap();

            let err = runtime
                .block_on(HttpAgentTransport::default().post_form(&url, "Summary=x".to_string()))
                .unwrap_err();
            assert_eq!(err, TransportError::Status(503));
        }

        #[test]
        fn non_success_status_is_reported() {
            let (url, _rx) = serve_once(
                "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\n\r\n".to_string(),
            );
            let err = HttpAgentTransport::default()
                .post_blocking(&url, "Summary=x")
                .unwrap_err();
            assert_eq!(err, TransportError::Status(500));
        }

        #[test]
        fn oversized_body_is_rejected() {
            let (url, _rx) = serve_once(ok_response(&"a".repeat(64)));
            let err = HttpAgentTransport::with_max_response_bytes(16)
                .post_blocking(&url, "Summary=x")
                .unwrap_err();
            assert_eq!(err, TransportError::TooLarge(16));
        }

        #[test]
        fn unreachable_service_is_a_network_error() {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            let addr = listener.local_addr().unwrap();
            drop(listener);

            let err = HttpAgentTransport::default()
                .post_blocking(&format!("http://{addr}/predict"), "Summary=x")
                .unwrap_err();
            assert!(matches!(err, TransportError::Network(_)));
        }
    }
}
