use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::model::{HealthBody, StreamEvent};

/// Errors from the detection service transport.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The service answered with a non-success HTTP status.
    #[error("service returned HTTP {status}")]
    Service { status: u16 },
    /// The request never completed: refused connection, timeout, DNS failure,
    /// or an unreadable body.
    #[error("transport failure: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

/// Outcome of a liveness request that reached the service.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HealthStatus {
    /// The root route answered 2xx. `running` is the server-reported state of
    /// the detection loop, if the body carried one.
    Alive { running: Option<bool> },
    /// The root route is missing (404) but something answered, so the
    /// transport is reachable.
    RouteMissing,
}

/// HTTP wrapper around the remote detection service.
#[derive(Clone)]
pub struct DetectorClient {
    http: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
}

impl DetectorClient {
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .connect_timeout(request_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout,
        })
    }

    /// Liveness/state request against the service root.
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let resp = self
            .http
            .get(format!("{}/", self.base_url))
            .timeout(self.request_timeout)
            .send()
            .await?;
        let status = resp.status();
        if status.is_success() {
            let body: HealthBody = resp.json().await?;
            Ok(HealthStatus::Alive {
                running: body.running,
            })
        } else if status == reqwest::StatusCode::NOT_FOUND {
            Ok(HealthStatus::RouteMissing)
        } else {
            Err(ClientError::Service {
                status: status.as_u16(),
            })
        }
    }

    /// Ask the service to start the detection loop.
    pub async fn start(&self) -> Result<(), ClientError> {
        self.control("start").await
    }

    /// Ask the service to stop the detection loop.
    pub async fn stop(&self) -> Result<(), ClientError> {
        self.control("stop").await
    }

    async fn control(&self, op: &str) -> Result<(), ClientError> {
        let resp = self
            .http
            .post(format!("{}/{}", self.base_url, op))
            .timeout(self.request_timeout)
            .send()
            .await?;
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ClientError::Service {
                status: status.as_u16(),
            })
        }
    }

    /// Attach to the live MJPEG stream. Returns a receiver of stream events;
    /// the reader task runs on the provided runtime handle until the stream
    /// fails, the server closes it, or the task is aborted.
    ///
    /// `attach_seq` is appended as a cache-busting token so a stale or
    /// half-open connection is never reused across a state transition. The
    /// connect phase is bounded by the client connect timeout; the body is a
    /// long-lived stream and carries no deadline of its own.
    pub fn open_stream(
        &self,
        attach_seq: u64,
        handle: &tokio::runtime::Handle,
    ) -> (mpsc::Receiver<StreamEvent>, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel::<StreamEvent>(256);
        let url = format!("{}/video_feed?attach={}", self.base_url, attach_seq);
        let http = self.http.clone();

        let task = handle.spawn(async move {
            let resp = match http.get(&url).send().await {
                Ok(r) => r,
                Err(e) => {
                    let _ = tx
                        .send(StreamEvent::Failed {
                            detail: e.to_string(),
                        })
                        .await;
                    return;
                }
            };
            if !resp.status().is_success() {
                let detail = format!("stream rejected with HTTP {}", resp.status().as_u16());
                let _ = tx.send(StreamEvent::Failed { detail }).await;
                return;
            }

            let mut body = Box::pin(resp.bytes_stream());
            let mut buf: Vec<u8> = Vec::new();
            while let Some(chunk) = body.next().await {
                match chunk {
                    Ok(bytes) => {
                        buf.extend_from_slice(&bytes);
                        for len in drain_frames(&mut buf) {
                            if tx.send(StreamEvent::Frame { len }).await.is_err() {
                                return; // receiver dropped (detached)
                            }
                        }
                        if buf.len() > MAX_PENDING_BYTES {
                            let detail =
                                format!("no frame boundary within {} bytes", MAX_PENDING_BYTES);
                            let _ = tx.send(StreamEvent::Failed { detail }).await;
                            return;
                        }
                    }
                    Err(e) => {
                        let _ = tx
                            .send(StreamEvent::Failed {
                                detail: e.to_string(),
                            })
                            .await;
                        return;
                    }
                }
            }
            let _ = tx.send(StreamEvent::Ended).await;
        });

        (rx, task)
    }
}

// --- Multipart frame parsing ---

/// Part delimiter used by the service's multipart/x-mixed-replace stream.
const BOUNDARY: &[u8] = b"--frame";

/// Abort the stream if this much data accumulates without a complete frame.
const MAX_PENDING_BYTES: usize = 8 * 1024 * 1024;

fn find_subsequence(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from >= haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

/// Split complete frames out of the accumulated stream buffer.
///
/// Each part looks like `--frame\r\nContent-Type: image/jpeg\r\n\r\n<jpeg>\r\n`;
/// a frame is complete once the next boundary shows up. Returns the payload
/// sizes and drains everything consumed, keeping a partial tail for the next
/// chunk.
pub(crate) fn drain_frames(buf: &mut Vec<u8>) -> Vec<usize> {
    let mut frames = Vec::new();
    loop {
        let Some(start) = find_subsequence(buf, BOUNDARY, 0) else {
            break;
        };
        let Some(header_end) = find_subsequence(buf, b"\r\n\r\n", start) else {
            break;
        };
        let payload_start = header_end + 4;
        let Some(next) = find_subsequence(buf, BOUNDARY, payload_start) else {
            break;
        };

        // Strip the CRLF that precedes the next boundary.
        let mut payload_end = next;
        while payload_end > payload_start
            && (buf[payload_end - 1] == b'\r' || buf[payload_end - 1] == b'\n')
        {
            payload_end -= 1;
        }
        frames.push(payload_end - payload_start);
        buf.drain(..next);
    }
    frames
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(payload: &[u8]) -> Vec<u8> {
        let mut out = b"--frame\r\nContent-Type: image/jpeg\r\n\r\n".to_vec();
        out.extend_from_slice(payload);
        out.extend_from_slice(b"\r\n");
        out
    }

    #[test]
    fn drain_frames_extracts_complete_frame() {
        let mut buf = part(b"AAAA");
        buf.extend_from_slice(b"--frame");
        assert_eq!(drain_frames(&mut buf), vec![4]);
        // The trailing boundary stays for the next part.
        assert_eq!(buf, b"--frame".to_vec());
    }

    #[test]
    fn drain_frames_keeps_partial_tail() {
        let mut buf = part(b"AAAA");
        // No following boundary yet: the frame is not known to be complete.
        assert!(drain_frames(&mut buf).is_empty());
        assert_eq!(buf, part(b"AAAA"));
    }

    #[test]
    fn drain_frames_handles_multiple_frames() {
        let mut buf = part(b"AAAA");
        buf.extend_from_slice(&part(b"BBBBBB"));
        buf.extend_from_slice(b"--frame");
        assert_eq!(drain_frames(&mut buf), vec![4, 6]);
    }

    #[test]
    fn drain_frames_survives_arbitrary_fragmentation() {
        let mut stream = part(b"AAAA");
        stream.extend_from_slice(&part(b"BBBBBB"));
        stream.extend_from_slice(b"--frame");

        let mut buf = Vec::new();
        let mut frames = Vec::new();
        for chunk in stream.chunks(3) {
            buf.extend_from_slice(chunk);
            frames.extend(drain_frames(&mut buf));
        }
        assert_eq!(frames, vec![4, 6]);
    }

    #[test]
    fn drain_frames_ignores_preamble_noise() {
        let mut buf = b"\r\n".to_vec();
        buf.extend_from_slice(&part(b"AA"));
        buf.extend_from_slice(b"--frame");
        assert_eq!(drain_frames(&mut buf), vec![2]);
    }

    #[test]
    fn client_error_display() {
        let err = ClientError::Service { status: 500 };
        assert_eq!(err.to_string(), "service returned HTTP 500");
        let err = ClientError::Transport("connection refused".into());
        assert_eq!(err.to_string(), "transport failure: connection refused");
    }
}
