use std::io::Read;
use std::time::Duration;

const USER_AGENT: &str = concat!("trakt-progress/", env!("CARGO_PKG_VERSION"));
const ERROR_BODY_PREVIEW_CHARS: usize = 240;
const MAX_BODY_BYTES: u64 = 512 * 1024 * 1024;

// Single attempt per call. Callers decide how a failure degrades.
fn send_get(
    url: &str,
    query: &[(&str, &str)],
    timeout: Duration,
) -> Result<ureq::Response, String> {
    let agent = ureq::AgentBuilder::new()
        .timeout_connect(timeout)
        .timeout(timeout)
        .build();

    let mut request = agent.get(url).set("User-Agent", USER_AGENT);
    for (key, value) in query {
        request = request.query(key, value);
    }

    match request.call() {
        Ok(response) => Ok(response),
        Err(ureq::Error::Status(status, response)) => {
            let response_body = response.into_string().ok().unwrap_or_default();
            let body = response_body.trim();
            if body.is_empty() {
                Err(format!("request failed: HTTP status {status}"))
            } else {
                let truncated = body
                    .chars()
                    .take(ERROR_BODY_PREVIEW_CHARS)
                    .collect::<String>();
                Err(format!("request failed: HTTP status {status} ({truncated})"))
            }
        }
        Err(ureq::Error::Transport(err)) => Err(format!("request failed: transport error: {err}")),
    }
}

pub(crate) fn get_bytes(
    url: &str,
    query: &[(&str, &str)],
    timeout: Duration,
) -> Result<Vec<u8>, String> {
    let response = send_get(url, query, timeout)?;
    let mut body = Vec::new();
    response
        .into_reader()
        .take(MAX_BODY_BYTES)
        .read_to_end(&mut body)
        .map_err(|err| format!("request failed: response read failed: {err}"))?;
    Ok(body)
}

pub(crate) fn get_text(
    url: &str,
    query: &[(&str, &str)],
    timeout: Duration,
) -> Result<String, String> {
    send_get(url, query, timeout)?
        .into_string()
        .map_err(|err| format!("request failed: response decode failed: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Behavior, TestServer};

    #[test]
    fn returns_body_on_success() {
        let server = TestServer::spawn(vec![Behavior::Respond(200, b"payload".to_vec())]);

        let body = get_bytes(&server.base_url, &[], Duration::from_millis(500))
            .expect("request should succeed");

        assert_eq!(body, b"payload");
        assert_eq!(server.request_count(), 1);
    }

    #[test]
    fn sends_query_parameters() {
        let server = TestServer::spawn(vec![Behavior::Respond(200, b"ok".to_vec())]);
        let url = format!("{}/3/find/tt123", server.base_url);

        let body = get_text(
            &url,
            &[("external_source", "imdb_id"), ("api_key", "k")],
            Duration::from_millis(500),
        )
        .expect("request should succeed");

        assert_eq!(body, "ok");
        let requested = server.requested_paths();
        assert_eq!(
            requested,
            vec!["/3/find/tt123?external_source=imdb_id&api_key=k".to_string()]
        );
    }

    #[test]
    fn does_not_retry_server_errors() {
        let server = TestServer::spawn(vec![
            Behavior::Respond(503, b"down".to_vec()),
            Behavior::Respond(200, b"ok".to_vec()),
        ]);

        let err = get_bytes(&server.base_url, &[], Duration::from_millis(500))
            .expect_err("503 should surface immediately");

        assert!(
            err.contains("HTTP status 503") && err.contains("down"),
            "unexpected error message: {err}"
        );
        assert_eq!(server.request_count(), 1);
    }

    #[test]
    fn reports_client_errors_without_body() {
        let server = TestServer::spawn(vec![Behavior::Respond(404, Vec::new())]);

        let err = get_text(&server.base_url, &[], Duration::from_millis(500))
            .expect_err("404 should fail");

        assert_eq!(err, "request failed: HTTP status 404");
    }

    #[test]
    fn times_out_slow_responses_once() {
        let server = TestServer::spawn(vec![Behavior::DelayRespond(
            Duration::from_millis(400),
            200,
            b"slow".to_vec(),
        )]);

        let err = get_bytes(&server.base_url, &[], Duration::from_millis(50))
            .expect_err("slow response should time out");

        assert!(
            err.contains("transport error"),
            "unexpected error message: {err}"
        );
        assert_eq!(server.request_count(), 1);
    }
}
