use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::config::EmbedConfig;
use crate::error::EmbedError;
use crate::normalize::l2_normalize_in_place;
use crate::Embedder;

/// HTTP client for a deployed embedding endpoint.
///
/// Posts `{"text": ..., "model": ...}` and accepts the common response
/// shapes: a bare vector, an `embedding`/`embeddings` field, or the
/// `predictions[].embeddings.values` layout some hosted models return.
#[derive(Debug)]
pub struct ApiEmbedder {
    cfg: EmbedConfig,
    client: reqwest::Client,
}

impl ApiEmbedder {
    /// Build an embedder from a validated api-mode config. The pooled
    /// client is shared across all calls made through this instance.
    pub fn new(cfg: EmbedConfig) -> Result<Self, EmbedError> {
        cfg.validate()?;
        if cfg.mode != "api" {
            return Err(EmbedError::InvalidConfig(format!(
                "ApiEmbedder requires mode \"api\", got {:?}",
                cfg.mode
            )));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
            .pool_max_idle_per_host(32)
            .build()
            .map_err(|e| EmbedError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { cfg, client })
    }

    async fn send(&self, text: &str) -> Result<Value, EmbedError> {
        let url = self
            .cfg
            .api_url
            .as_deref()
            .ok_or_else(|| EmbedError::InvalidConfig("api_url is required for api mode".into()))?;

        let mut request = self
            .client
            .post(url)
            .header("Content-Type", "application/json");
        if let Some(header) = self.cfg.api_auth_header.as_deref() {
            request = request.header("Authorization", header);
        }

        let payload = json!({ "text": text, "model": self.cfg.model_name });
        let response = request
            .json(&payload)
            .send()
            .await
            .map_err(|e| EmbedError::Http(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EmbedError::Http(format!("HTTP {status}: {body}")));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| EmbedError::InvalidResponse(format!("invalid JSON: {e}")))
    }
}

#[async_trait]
impl Embedder for ApiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let response = self.send(text).await?;
        let mut vector = parse_embedding(response)?;
        if self.cfg.normalize {
            l2_normalize_in_place(&mut vector);
        }
        tracing::debug!(
            model = %self.cfg.model_name,
            dim = vector.len(),
            "embedding generated"
        );
        Ok(vector)
    }
}

fn parse_embedding(value: Value) -> Result<Vec<f32>, EmbedError> {
    match value {
        Value::Array(_) => parse_vector(value),
        Value::Object(mut map) => {
            if let Some(embedding) = map.remove("embedding") {
                return parse_vector(embedding);
            }
            if let Some(Value::Array(items)) = map.remove("embeddings") {
                return items
                    .into_iter()
                    .next()
                    .map(parse_vector)
                    .unwrap_or_else(|| {
                        Err(EmbedError::InvalidResponse("empty `embeddings` array".into()))
                    });
            }
            if let Some(Value::Array(predictions)) = map.remove("predictions") {
                if let Some(Value::Object(mut prediction)) = predictions.into_iter().next() {
                    if let Some(Value::Object(mut embeddings)) = prediction.remove("embeddings") {
                        if let Some(values) = embeddings.remove("values") {
                            return parse_vector(values);
                        }
                    }
                }
                return Err(EmbedError::InvalidResponse(
                    "missing `embeddings.values` in prediction".into(),
                ));
            }
            Err(EmbedError::InvalidResponse(
                "unsupported response shape".into(),
            ))
        }
        other => Err(EmbedError::InvalidResponse(format!(
            "expected object or array, got {other:?}"
        ))),
    }
}

fn parse_vector(value: Value) -> Result<Vec<f32>, EmbedError> {
    match value {
        Value::Array(values) => values
            .into_iter()
            .map(|entry| match entry {
                Value::Number(num) => num.as_f64().map(|f| f as f32).ok_or_else(|| {
                    EmbedError::InvalidResponse("non-finite embedding value".into())
                }),
                other => Err(EmbedError::InvalidResponse(format!(
                    "embedding entries must be numbers, got {other:?}"
                ))),
            })
            .collect(),
        other => Err(EmbedError::InvalidResponse(format!(
            "embedding vector must be an array, got {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_stub_mode_config() {
        let err = ApiEmbedder::new(EmbedConfig::default()).expect_err("should fail");
        assert!(matches!(err, EmbedError::InvalidConfig(_)));
    }

    #[test]
    fn parses_bare_vector() {
        let v = parse_embedding(json!([0.1, 0.2, 0.3])).expect("parse");
        assert_eq!(v, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn parses_embedding_field() {
        let v = parse_embedding(json!({ "embedding": [1.0, 2.0] })).expect("parse");
        assert_eq!(v, vec![1.0, 2.0]);
    }

    #[test]
    fn parses_first_of_embeddings_array() {
        let v = parse_embedding(json!({ "embeddings": [[1.0], [2.0]] })).expect("parse");
        assert_eq!(v, vec![1.0]);
    }

    #[test]
    fn parses_hosted_model_predictions_shape() {
        let v = parse_embedding(json!({
            "predictions": [{ "embeddings": { "values": [0.5, 0.25] } }]
        }))
        .expect("parse");
        assert_eq!(v, vec![0.5, 0.25]);
    }

    #[test]
    fn rejects_non_numeric_entries() {
        let err = parse_embedding(json!({ "embedding": ["a"] })).expect_err("should fail");
        assert!(matches!(err, EmbedError::InvalidResponse(_)));
    }

    #[test]
    fn rejects_unknown_shape() {
        let err = parse_embedding(json!({ "scores": [1.0] })).expect_err("should fail");
        assert!(matches!(err, EmbedError::InvalidResponse(_)));
    }
}
