use std::pin::Pin;

use bytes::Bytes;
use futures::{Stream, StreamExt, stream};
use mealgen_planner::GenerationRequest;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::instrument;
use url::Url;

use crate::{ClientError, Utf8Decoder};

pub const GENERATE_PATH: &str = "/api/generate-meal-plan";

/// Ordered text chunks of one response body.
///
/// The stream owns the HTTP response: dropping it, whether exhausted, after an
/// error or half-way through, releases the connection.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<String, ClientError>> + Send>>;

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_endpoint_base_url")]
    pub endpoint_base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint_base_url: default_endpoint_base_url(),
        }
    }
}

fn default_endpoint_base_url() -> String {
    "http://localhost:3001".to_owned()
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GenerationClient {
    endpoint: Url,
    http: reqwest::Client,
}

impl GenerationClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let endpoint = Url::parse(&format!(
            "{}{GENERATE_PATH}",
            config.endpoint_base_url.trim_end_matches('/')
        ))?;

        Ok(Self {
            endpoint,
            http: reqwest::Client::new(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Send `request` and return the streamed body.
    ///
    /// A non-success status or an empty body is reported here, before any
    /// chunk is produced.
    #[instrument(skip_all, fields(days = request.days(), people = request.people()))]
    pub async fn generate(&self, request: &GenerationRequest) -> Result<ChunkStream, ClientError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(ErrorBody { error: Some(error) }) => error,
                _ => format!("HTTP error! status: {}", status.as_u16()),
            };
            tracing::warn!(status = status.as_u16(), %message, "Backend rejected generation request");
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        if status == StatusCode::NO_CONTENT || response.content_length() == Some(0) {
            return Err(ClientError::EmptyBody);
        }

        Ok(decode_stream(response.bytes_stream()))
    }
}

struct DecodeState<S> {
    bytes: S,
    decoder: Utf8Decoder,
    ended: bool,
}

/// Decode a byte stream into non-empty text chunks, one per network chunk.
pub(crate) fn decode_stream<S, E>(bytes: S) -> ChunkStream
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Into<ClientError> + Send + 'static,
{
    let state = DecodeState {
        bytes: Box::pin(bytes),
        decoder: Utf8Decoder::new(),
        ended: false,
    };

    let chunks = stream::unfold(state, |mut state| async move {
        while !state.ended {
            match state.bytes.next().await {
                Some(Ok(chunk)) => {
                    let text = state.decoder.decode(&chunk);
                    if !text.is_empty() {
                        return Some((Ok(text), state));
                    }
                }
                Some(Err(e)) => {
                    state.ended = true;
                    return Some((Err(e.into()), state));
                }
                None => {
                    state.ended = true;
                    let text = state.decoder.finish();
                    if !text.is_empty() {
                        return Some((Ok(text), state));
                    }
                }
            }
        }

        None
    });

    Box::pin(chunks)
}
