//! Logging trait for Gemini client operations.
//!
//! This module provides the [`ClientLogger`] trait that allows users to capture
//! and log all API interactions passing through the [`Gemini`](crate::Gemini)
//! client, and [`StderrLogger`], a line-oriented implementation used by the
//! binaries' `--verbose` flag.

use std::io::Write;

use crate::types::{GenerateContentRequest, GenerateContentResponse, Model};

/// A trait for logging Gemini client operations.
///
/// Implement this trait to capture and record all API interactions,
/// including both one-shot responses and individual streaming chunks.
///
/// # Example
///
/// ```rust,ignore
/// use geminus::{ClientLogger, GenerateContentRequest, GenerateContentResponse, Model};
/// use std::sync::Mutex;
///
/// struct FileLogger {
///     file: Mutex<std::fs::File>,
/// }
///
/// impl ClientLogger for FileLogger {
///     fn log_request(&self, model: &Model, request: &GenerateContentRequest) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "{model}: {}", serde_json::to_string(request).unwrap()).unwrap();
///     }
///
///     fn log_response(&self, response: &GenerateContentResponse) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "Response: {}", serde_json::to_string(response).unwrap()).unwrap();
///     }
///
///     fn log_stream_chunk(&self, chunk: &GenerateContentResponse) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "Chunk: {}", serde_json::to_string(chunk).unwrap()).unwrap();
///     }
///
///     fn log_stream_complete(&self, chunks: usize) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "Stream complete after {chunks} chunks").unwrap();
///     }
/// }
/// ```
pub trait ClientLogger: Send + Sync {
    /// Log an outgoing request before it is sent.
    fn log_request(&self, model: &Model, request: &GenerateContentRequest);

    /// Log a complete response from a one-shot `generate_content` call.
    fn log_response(&self, response: &GenerateContentResponse);

    /// Log an individual streaming chunk.
    ///
    /// This method is called for each chunk received during a streaming
    /// request, in arrival order.
    fn log_stream_chunk(&self, chunk: &GenerateContentResponse);

    /// Log the end of a stream that finished without error.
    fn log_stream_complete(&self, chunks: usize);
}

/// Writes every interaction to stderr as a single JSON line.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrLogger;

impl StderrLogger {
    fn write_line(&self, label: &str, body: &impl serde::Serialize) {
        let body = serde_json::to_string(body).unwrap_or_else(|e| format!("<unserializable: {e}>"));
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr, "[geminus] {label}: {body}");
    }
}

impl ClientLogger for StderrLogger {
    fn log_request(&self, model: &Model, request: &GenerateContentRequest) {
        self.write_line(&format!("request {model}"), request);
    }

    fn log_response(&self, response: &GenerateContentResponse) {
        self.write_line("response", response);
    }

    fn log_stream_chunk(&self, chunk: &GenerateContentResponse) {
        self.write_line("chunk", chunk);
    }

    fn log_stream_complete(&self, chunks: usize) {
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr, "[geminus] stream complete: {chunks} chunks");
    }
}
