//! Server-Sent Events (SSE) processing for streaming responses.
//!
//! `streamGenerateContent?alt=sse` answers with a sequence of `data:` events,
//! each carrying one complete [`GenerateContentResponse`] chunk.  This module
//! turns the raw byte stream into a stream of those chunks.

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};

use crate::observability::{STREAM_BYTES, STREAM_ERRORS, STREAM_EVENTS};
use crate::types::GenerateContentResponse;
use crate::{Error, Result};

/// Process a stream of bytes into a stream of response chunks.
///
/// Events may be split across network reads and several events may arrive in
/// one read; the buffer is kept as bytes so a multi-byte character split by
/// the network is reassembled before decoding.
pub fn process_sse<S>(byte_stream: S) -> impl Stream<Item = Result<GenerateContentResponse>>
where
    S: Stream<Item = std::result::Result<Bytes, reqwest::Error>> + Unpin,
{
    let stream = byte_stream.map(|result| {
        result
            .map_err(|e| Error::streaming(format!("Error in HTTP stream: {e}"), Some(Box::new(e))))
    });

    let buffer: Vec<u8> = Vec::new();

    stream::unfold(
        (stream, buffer),
        move |(mut stream, mut buffer)| async move {
            loop {
                if let Some((event, remaining)) = extract_event(&buffer) {
                    buffer = remaining;
                    match event {
                        Some(event) => return Some((event, (stream, buffer))),
                        None => continue,
                    }
                }

                match stream.next().await {
                    Some(Ok(bytes)) => {
                        STREAM_BYTES.count(bytes.len() as u64);
                        buffer.extend_from_slice(&bytes);
                    }
                    Some(Err(e)) => {
                        STREAM_ERRORS.click();
                        return Some((Err(e), (stream, buffer)));
                    }
                    None => {
                        // A final event without the trailing blank line.
                        if buffer.iter().all(u8::is_ascii_whitespace) {
                            return None;
                        }
                        let last = std::mem::take(&mut buffer);
                        return parse_event(&last).map(|event| (event, (stream, buffer)));
                    }
                }
            }
        },
    )
}

/// Split one complete event off the front of `buffer`.
///
/// Returns `None` when no complete event is buffered yet.  The inner option is
/// `None` for events that carry no data (comments, keep-alives).
fn extract_event(buffer: &[u8]) -> Option<(Option<Result<GenerateContentResponse>>, Vec<u8>)> {
    let (end, delimiter_len) = find_delimiter(buffer)?;
    let event = parse_event(&buffer[..end]);
    let rest = buffer[end + delimiter_len..].to_vec();
    Some((event, rest))
}

/// Locate the earliest blank line, accepting both `\n\n` and `\r\n\r\n`.
fn find_delimiter(buffer: &[u8]) -> Option<(usize, usize)> {
    let lf = buffer.windows(2).position(|w| w == b"\n\n").map(|i| (i, 2));
    let crlf = buffer
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .map(|i| (i, 4));
    match (lf, crlf) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    }
}

/// Parse the lines of a single event into a response chunk.
fn parse_event(raw: &[u8]) -> Option<Result<GenerateContentResponse>> {
    let text = match std::str::from_utf8(raw) {
        Ok(text) => text,
        Err(e) => {
            STREAM_ERRORS.click();
            return Some(Err(Error::encoding(
                format!("Invalid UTF-8 in stream: {e}"),
                Some(Box::new(e)),
            )));
        }
    };

    let mut data = String::new();
    for line in text.lines() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() || line.starts_with(':') {
            continue;
        }
        if let Some(payload) = line.strip_prefix("data:") {
            if !data.is_empty() {
                data.push('\n');
            }
            data.push_str(payload.strip_prefix(' ').unwrap_or(payload));
        } else if line.starts_with("event:") || line.starts_with("id:") || line.starts_with("retry:")
        {
            continue;
        } else {
            STREAM_ERRORS.click();
            return Some(Err(Error::serialization(
                format!("Malformed SSE event: unexpected line '{line}'"),
                None,
            )));
        }
    }

    if data.is_empty() {
        return None;
    }
    STREAM_EVENTS.click();
    if let Some(err) = error_event(&data) {
        STREAM_ERRORS.click();
        return Some(Err(err));
    }
    match serde_json::from_str::<GenerateContentResponse>(&data) {
        Ok(chunk) => Some(Ok(chunk)),
        Err(e) => {
            STREAM_ERRORS.click();
            Some(Err(e.into()))
        }
    }
}

/// Google reports mid-stream failures as an `{"error": {...}}` payload.
fn error_event(data: &str) -> Option<Error> {
    #[derive(serde::Deserialize)]
    struct ErrorEvent {
        error: ErrorDetail,
    }

    #[derive(serde::Deserialize)]
    struct ErrorDetail {
        #[serde(default)]
        code: Option<u16>,
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        status: Option<String>,
    }

    let event: ErrorEvent = serde_json::from_str(data).ok()?;
    Some(Error::api(
        event.error.code.unwrap_or(500),
        event.error.status,
        event
            .error
            .message
            .unwrap_or_else(|| "stream error".to_string()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn chunk(text: &str) -> String {
        format!(
            "data: {{\"candidates\": [{{\"content\": {{\"role\": \"model\", \"parts\": [{{\"text\": \"{text}\"}}]}}}}]}}"
        )
    }

    fn bytes_stream(
        parts: Vec<String>,
    ) -> impl Stream<Item = std::result::Result<Bytes, reqwest::Error>> + Unpin {
        stream::iter(parts.into_iter().map(|p| Ok(Bytes::from(p))))
    }

    #[tokio::test]
    async fn parse_single_chunk() {
        let data = format!("{}\r\n\r\n", chunk("A fever "));
        let mut sse_stream = Box::pin(process_sse(bytes_stream(vec![data])));
        let event = sse_stream.next().await.unwrap().unwrap();
        assert_eq!(event.text().unwrap(), "A fever ");
        assert!(sse_stream.next().await.is_none());
    }

    #[tokio::test]
    async fn parse_multiple_chunks_in_one_read() {
        let data = format!("{}\n\n{}\n\n", chunk("A fever "), chunk("is a "));
        let mut sse_stream = Box::pin(process_sse(bytes_stream(vec![data])));

        let first = sse_stream.next().await.unwrap().unwrap();
        assert_eq!(first.text().unwrap(), "A fever ");
        let second = sse_stream.next().await.unwrap().unwrap();
        assert_eq!(second.text().unwrap(), "is a ");
        assert!(sse_stream.next().await.is_none());
    }

    #[tokio::test]
    async fn handle_split_event() {
        let data = format!("{}\r\n\r\n", chunk("temperature rise."));
        let (head, tail) = data.split_at(17);
        let mut sse_stream = Box::pin(process_sse(bytes_stream(vec![
            head.to_string(),
            tail.to_string(),
        ])));
        let event = sse_stream.next().await.unwrap().unwrap();
        assert_eq!(event.text().unwrap(), "temperature rise.");
    }

    #[tokio::test]
    async fn handle_split_multibyte_character() {
        let data = format!("{}\n\n", chunk("fièvre"));
        let bytes = data.into_bytes();
        let split = bytes.iter().position(|b| *b == 0xC3).unwrap() + 1;
        let parts: Vec<std::result::Result<Bytes, reqwest::Error>> = vec![
            Ok(Bytes::from(bytes[..split].to_vec())),
            Ok(Bytes::from(bytes[split..].to_vec())),
        ];
        let mut sse_stream = Box::pin(process_sse(stream::iter(parts)));
        let event = sse_stream.next().await.unwrap().unwrap();
        assert_eq!(event.text().unwrap(), "fièvre");
    }

    #[tokio::test]
    async fn trailing_event_without_blank_line() {
        let mut sse_stream = Box::pin(process_sse(bytes_stream(vec![chunk("done")])));
        let event = sse_stream.next().await.unwrap().unwrap();
        assert_eq!(event.text().unwrap(), "done");
        assert!(sse_stream.next().await.is_none());
    }

    #[tokio::test]
    async fn comments_are_skipped() {
        let data = format!(": keep-alive\n\n{}\n\n", chunk("hi"));
        let mut sse_stream = Box::pin(process_sse(bytes_stream(vec![data])));
        let event = sse_stream.next().await.unwrap().unwrap();
        assert_eq!(event.text().unwrap(), "hi");
    }

    #[tokio::test]
    async fn handle_malformed_event() {
        let data = "malformed data without proper format\n\n".to_string();
        let mut sse_stream = Box::pin(process_sse(bytes_stream(vec![data])));
        let event = sse_stream.next().await.unwrap();
        assert!(event.is_err());
    }

    #[tokio::test]
    async fn error_payload_becomes_api_error() {
        let data = "data: {\"error\": {\"code\": 503, \"message\": \"overloaded\", \"status\": \"UNAVAILABLE\"}}\n\n".to_string();
        let mut sse_stream = Box::pin(process_sse(bytes_stream(vec![data])));
        let err = sse_stream.next().await.unwrap().unwrap_err();
        assert_eq!(err.status_code(), Some(503));
        assert!(err.to_string().contains("overloaded"));
    }
}
