use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("geminus.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("geminus.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("geminus.client.request_duration_seconds");

pub(crate) static STREAM_EVENTS: Counter = Counter::new("geminus.stream.events");
pub(crate) static STREAM_ERRORS: Counter = Counter::new("geminus.stream.errors");
pub(crate) static STREAM_BYTES: Counter = Counter::new("geminus.stream.bytes");
pub(crate) static STREAM_TTFB: Moments = Moments::new("geminus.stream.ttfb_seconds");

pub(crate) static CHAT_TURNS: Counter = Counter::new("geminus.chat.turns");
pub(crate) static CHAT_ROLLBACKS: Counter = Counter::new("geminus.chat.rollbacks");

pub(crate) static ASSIST_SUBMISSIONS: Counter = Counter::new("geminus.assist.submissions");
pub(crate) static ASSIST_REJECTED: Counter = Counter::new("geminus.assist.rejected");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&STREAM_EVENTS);
    collector.register_counter(&STREAM_ERRORS);
    collector.register_counter(&STREAM_BYTES);
    collector.register_moments(&STREAM_TTFB);

    collector.register_counter(&CHAT_TURNS);
    collector.register_counter(&CHAT_ROLLBACKS);

    collector.register_counter(&ASSIST_SUBMISSIONS);
    collector.register_counter(&ASSIST_REJECTED);
}
