//! The completion seam between sessions and the remote model.
//!
//! Sessions only see the [`Completion`] trait.  [`GenerativeModel`] implements
//! it over the Gemini REST client; tests implement it with canned chunks.

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::stream::{self, Stream, StreamExt};

use crate::client::Gemini;
use crate::config::ModelConfig;
use crate::types::{Content, GenerateContentRequest};
use crate::{Error, Result};

/// A finite, pull-based sequence of text fragments.
///
/// Fragments arrive in order.  `Ok(None)` from [`TextChunks::next_chunk`] is
/// the terminal signal; after it, or after the first error, the sequence is
/// finished and keeps returning `Ok(None)`.
pub struct TextChunks {
    inner: Option<Pin<Box<dyn Stream<Item = Result<String>> + Send>>>,
}

impl TextChunks {
    /// Wrap a stream of fragments.
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<String>> + Send + 'static,
    {
        Self {
            inner: Some(Box::pin(stream)),
        }
    }

    /// A sequence that yields `results` in order.
    pub fn from_results(results: Vec<Result<String>>) -> Self {
        Self::new(stream::iter(results))
    }

    /// Fetch the next fragment.
    pub async fn next_chunk(&mut self) -> Result<Option<String>> {
        self.next().await.transpose()
    }

    /// True once the terminal signal or an error has been returned.
    pub fn is_finished(&self) -> bool {
        self.inner.is_none()
    }

    /// Drain the sequence and concatenate every fragment.
    pub async fn collect_text(mut self) -> Result<String> {
        let mut text = String::new();
        while let Some(chunk) = self.next_chunk().await? {
            text.push_str(&chunk);
        }
        Ok(text)
    }
}

impl Stream for TextChunks {
    type Item = Result<String>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let Some(inner) = self.inner.as_mut() else {
            return Poll::Ready(None);
        };
        match inner.as_mut().poll_next(cx) {
            Poll::Ready(Some(Ok(text))) => Poll::Ready(Some(Ok(text))),
            Poll::Ready(Some(Err(e))) => {
                self.inner = None;
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                self.inner = None;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl fmt::Debug for TextChunks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextChunks")
            .field("finished", &self.is_finished())
            .finish()
    }
}

/// A remote text-generation capability.
#[async_trait::async_trait]
pub trait Completion: Send + Sync {
    /// Open a chat on `history`, submit `message`, and stream the reply.
    async fn stream_completion(&self, history: Vec<Content>, message: Content)
    -> Result<TextChunks>;

    /// Submit one flat prompt and return the whole reply.
    async fn complete_once(&self, prompt: &str) -> Result<String>;

    /// The model name shown to users.
    fn model_name(&self) -> String {
        "unknown".to_string()
    }
}

/// A Gemini model with the configuration applied to every request.
#[derive(Debug, Clone)]
pub struct GenerativeModel {
    client: Gemini,
    config: ModelConfig,
}

impl GenerativeModel {
    pub fn new(client: Gemini, config: ModelConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Begin a chat whose prior history is `history`.
    pub fn start_chat(&self, history: Vec<Content>) -> RemoteChat<'_> {
        RemoteChat {
            model: self,
            history,
        }
    }

    fn request(&self, contents: Vec<Content>) -> GenerateContentRequest {
        GenerateContentRequest::new(contents)
            .with_generation_config(self.config.generation)
            .with_safety_settings(self.config.safety_settings.clone())
    }
}

#[async_trait::async_trait]
impl Completion for GenerativeModel {
    async fn stream_completion(
        &self,
        history: Vec<Content>,
        message: Content,
    ) -> Result<TextChunks> {
        self.start_chat(history).send_message_stream(message).await
    }

    async fn complete_once(&self, prompt: &str) -> Result<String> {
        let request = self.request(vec![Content::user(prompt)]);
        let response = self
            .client
            .generate_content(&self.config.model, &request)
            .await?;
        let text = response.text()?;
        if response.candidates.is_empty() {
            return Err(Error::unknown("response contained no candidates"));
        }
        Ok(text)
    }

    fn model_name(&self) -> String {
        self.config.model.to_string()
    }
}

/// One logical chat; consumed by the message it sends.
#[derive(Debug)]
pub struct RemoteChat<'a> {
    model: &'a GenerativeModel,
    history: Vec<Content>,
}

impl RemoteChat<'_> {
    pub fn history(&self) -> &[Content] {
        &self.history
    }

    /// Send `message` after the history and stream the reply's text.
    ///
    /// Chunks without text (the usage-only tail of a stream) are skipped.
    pub async fn send_message_stream(self, message: Content) -> Result<TextChunks> {
        let mut contents = self.history;
        contents.push(message);
        let request = self.model.request(contents);
        let chunks = self
            .model
            .client
            .stream_generate_content(&self.model.config.model, &request)
            .await?;
        let text = chunks.filter_map(|chunk| async move {
            match chunk.and_then(|chunk| chunk.text()) {
                Ok(text) if text.is_empty() => None,
                other => Some(other),
            }
        });
        Ok(TextChunks::new(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    #[tokio::test]
    async fn chunks_arrive_in_order_then_terminate() {
        let mut chunks =
            TextChunks::from_results(vec![Ok("A fever ".to_string()), Ok("is a ".to_string())]);
        assert!(!chunks.is_finished());
        assert_eq!(chunks.next_chunk().await.unwrap().as_deref(), Some("A fever "));
        assert_eq!(chunks.next_chunk().await.unwrap().as_deref(), Some("is a "));
        assert_eq!(chunks.next_chunk().await.unwrap(), None);
        assert!(chunks.is_finished());
        assert_eq!(chunks.next_chunk().await.unwrap(), None);
    }

    #[tokio::test]
    async fn error_finishes_the_sequence() {
        let mut chunks = TextChunks::from_results(vec![
            Ok("partial".to_string()),
            Err(Error::streaming("connection reset", None)),
            Ok("never seen".to_string()),
        ]);
        assert_eq!(chunks.next_chunk().await.unwrap().as_deref(), Some("partial"));
        assert!(chunks.next_chunk().await.unwrap_err().is_streaming());
        assert!(chunks.is_finished());
        assert_eq!(chunks.next_chunk().await.unwrap(), None);
    }

    #[tokio::test]
    async fn collect_text_concatenates() {
        let chunks = TextChunks::from_results(vec![
            Ok("A fever ".to_string()),
            Ok("is a ".to_string()),
            Ok("temperature rise.".to_string()),
        ]);
        assert_eq!(
            chunks.collect_text().await.unwrap(),
            "A fever is a temperature rise."
        );
    }

    #[tokio::test]
    async fn collect_text_propagates_errors() {
        let chunks = TextChunks::from_results(vec![
            Ok("A fever ".to_string()),
            Err(Error::blocked("the response was blocked", Some("SAFETY".into()))),
        ]);
        assert!(chunks.collect_text().await.unwrap_err().is_blocked());
    }

    #[test]
    fn requests_carry_the_model_config() {
        let client = Gemini::new(Some("test-key".to_string())).unwrap();
        let model = GenerativeModel::new(client, ModelConfig::new());
        let chat = model.start_chat(vec![Content::model("Hello!")]);
        assert_eq!(chat.history().len(), 1);

        let request = model.request(vec![Content::user("hi")]);
        assert_eq!(request.contents[0].role, Some(Role::User));
        assert_eq!(request.generation_config, Some(model.config().generation));
        assert_eq!(request.safety_settings, model.config().safety_settings);
        assert_eq!(model.model_name(), "gemini-2.0-flash");
    }
}

/// A scripted [`Completion`] for session tests.
#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::{Completion, TextChunks};
    use crate::types::Content;
    use crate::{Error, Result};

    /// What the next call returns.
    #[derive(Debug, Clone)]
    pub enum Reply {
        /// The call succeeds and yields these fragments.
        Chunks(Vec<Result<String>>),
        /// The call fails before any fragment.
        Fail(Error),
        /// A one-shot call returns this text.
        Text(String),
    }

    impl Reply {
        pub fn chunks(chunks: &[&str]) -> Self {
            Reply::Chunks(chunks.iter().map(|c| Ok(c.to_string())).collect())
        }
    }

    /// One recorded call.
    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Stream { history: Vec<Content>, message: Content },
        Once { prompt: String },
    }

    #[derive(Debug, Default)]
    pub struct ScriptedCompletion {
        replies: Mutex<VecDeque<Reply>>,
        calls: Mutex<Vec<Call>>,
    }

    impl ScriptedCompletion {
        pub fn new(replies: Vec<Reply>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn next_reply(&self, call: Call) -> Reply {
            self.calls.lock().unwrap().push(call);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .expect("no scripted reply left")
        }
    }

    #[async_trait::async_trait]
    impl Completion for ScriptedCompletion {
        async fn stream_completion(
            &self,
            history: Vec<Content>,
            message: Content,
        ) -> Result<TextChunks> {
            match self.next_reply(Call::Stream { history, message }) {
                Reply::Chunks(chunks) => Ok(TextChunks::from_results(chunks)),
                Reply::Text(text) => Ok(TextChunks::from_results(vec![Ok(text)])),
                Reply::Fail(err) => Err(err),
            }
        }

        async fn complete_once(&self, prompt: &str) -> Result<String> {
            let call = Call::Once {
                prompt: prompt.to_string(),
            };
            match self.next_reply(call) {
                Reply::Text(text) => Ok(text),
                Reply::Chunks(chunks) => TextChunks::from_results(chunks).collect_text().await,
                Reply::Fail(err) => Err(err),
            }
        }

        fn model_name(&self) -> String {
            "scripted".to_string()
        }
    }
}
