//! Server-Sent Events transport for reply streams.
//!
//! Each [`StreamEvent`] becomes one `data: <json>\n\n` frame. No event
//! names, ids or keep-alive comments are sent; the client only parses
//! `data:` lines.

use axum::response::sse::{Event, Sse};
use chatmock_core::StreamEvent;
use futures::{Stream, StreamExt};

pub fn reply_sse<S>(events: S) -> Sse<impl Stream<Item = Result<Event, axum::Error>>>
where
    S: Stream<Item = StreamEvent> + Send + 'static,
{
    Sse::new(events.map(|event| Event::default().json_data(event)))
}

#[cfg(test)]
mod test {
    use super::*;
    use axum::response::IntoResponse;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn frames_are_bare_data_lines() {
        let events = futures::stream::iter([
            StreamEvent::content("Hello ", None),
            StreamEvent::Complete,
        ]);
        let response = reply_sse(events).into_response();
        assert_eq!(
            response.headers()[axum::http::header::CONTENT_TYPE],
            "text/event-stream"
        );

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(
            std::str::from_utf8(&body).unwrap(),
            "data: {\"text\":\"Hello \",\"imageUrl\":null}\n\ndata: {\"complete\":true}\n\n"
        );
    }
}
