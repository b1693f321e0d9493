//! HTTP gateway backed by the remote patient API.
//!
//! Speaks the API's two-endpoint contract:
//!
//! - `GET <base>/{patient_id}` returns `{"measurements": [...]}`
//! - `POST <base>/{patient_id}` with `{"message": ...}` returns `{"stored": bool}`
//!
//! Non-2xx responses are transport failures. Payloads that cannot be parsed
//! into readings are decode failures.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Acknowledgment, GatewayError, PatientGateway};
use crate::data::{MeasurementsPayload, Reading};

/// Gateway implementation using the remote HTTP API.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url_template: String,
}

/// Request body for sending advice.
#[derive(Debug, Serialize)]
struct AdviceBody<'a> {
    message: &'a str,
}

/// Reply body for a sent advice message.
///
/// The `stored` field is optional on the wire; a missing field decodes as
/// `false` rather than failing.
#[derive(Debug, Deserialize)]
struct StoredReply {
    #[serde(default)]
    stored: bool,
}

impl HttpGateway {
    /// Create a gateway for the given URL template.
    ///
    /// The template contains one `{}` placeholder for the patient id, e.g.
    /// `https://example.org/rpm/patients/{}`. If the placeholder is absent
    /// the id is appended as a path segment.
    pub fn new(base_url_template: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url_template: base_url_template.into(),
        }
    }

    /// Resolve the resource URL for a patient.
    fn url_for(&self, patient_id: u32) -> String {
        let id = patient_id.to_string();
        if self.base_url_template.contains("{}") {
            self.base_url_template.replacen("{}", &id, 1)
        } else {
            format!("{}/{}", self.base_url_template.trim_end_matches('/'), id)
        }
    }
}

#[async_trait]
impl PatientGateway for HttpGateway {
    async fn fetch(&self, patient_id: u32) -> Result<Vec<Reading>, GatewayError> {
        let url = self.url_for(patient_id);
        debug!(%url, patient_id, "fetching patient readings");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(GatewayError::Transport(format!(
                "server returned {}",
                response.status()
            )));
        }

        let payload: MeasurementsPayload = response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?;

        payload
            .measurements
            .iter()
            .map(Reading::from_wire)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| GatewayError::Decode(format!("bad timestamp: {e}")))
    }

    async fn send_advice(
        &self,
        patient_id: u32,
        text: &str,
    ) -> Result<Acknowledgment, GatewayError> {
        let url = self.url_for(patient_id);
        debug!(%url, patient_id, "sending advice");

        let response = self
            .client
            .post(&url)
            .json(&AdviceBody { message: text })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(GatewayError::Transport(format!(
                "server returned {}",
                response.status()
            )));
        }

        let reply: StoredReply = response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?;

        Ok(Acknowledgment { stored: reply.stored })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn template(server: &MockServer) -> String {
        format!("{}/patients/{{}}", server.uri())
    }

    #[test]
    fn test_url_for_with_placeholder() {
        let gateway = HttpGateway::new("https://example.org/rpm/patients/{}");
        assert_eq!(gateway.url_for(42), "https://example.org/rpm/patients/42");
    }

    #[test]
    fn test_url_for_without_placeholder() {
        let gateway = HttpGateway::new("https://example.org/rpm/patients/");
        assert_eq!(gateway.url_for(42), "https://example.org/rpm/patients/42");
    }

    #[tokio::test]
    async fn test_fetch_decodes_readings_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/patients/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "measurements": [
                    {"timestamp": "2024-03-01T10:00:00Z", "spo2": 98},
                    {"timestamp": "2024-03-01T09:30:00Z", "spo2": 92}
                ]
            })))
            .mount(&server)
            .await;

        let gateway = HttpGateway::new(template(&server));
        let readings = gateway.fetch(1).await.unwrap();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].spo2, 98);
        assert_eq!(readings[1].spo2, 92);
    }

    #[tokio::test]
    async fn test_fetch_server_error_is_transport() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/patients/1"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let gateway = HttpGateway::new(template(&server));
        let err = gateway.fetch(1).await.unwrap_err();
        assert!(matches!(err, GatewayError::Transport(_)), "{err:?}");
    }

    #[tokio::test]
    async fn test_fetch_missing_field_is_decode() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/patients/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "measurements": [{"timestamp": "2024-03-01T10:00:00Z"}]
            })))
            .mount(&server)
            .await;

        let gateway = HttpGateway::new(template(&server));
        let err = gateway.fetch(1).await.unwrap_err();
        assert!(matches!(err, GatewayError::Decode(_)), "{err:?}");
    }

    #[tokio::test]
    async fn test_fetch_malformed_timestamp_is_decode() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/patients/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "measurements": [{"timestamp": "not-a-time", "spo2": 97}]
            })))
            .mount(&server)
            .await;

        let gateway = HttpGateway::new(template(&server));
        let err = gateway.fetch(1).await.unwrap_err();
        assert!(matches!(err, GatewayError::Decode(_)), "{err:?}");
    }

    #[tokio::test]
    async fn test_send_advice_stored() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/patients/42"))
            .and(body_json(json!({"message": "Rest and monitor closely"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"stored": true})))
            .mount(&server)
            .await;

        let gateway = HttpGateway::new(template(&server));
        let ack = gateway.send_advice(42, "Rest and monitor closely").await.unwrap();
        assert!(ack.stored);
    }

    #[tokio::test]
    async fn test_send_advice_missing_stored_field_is_false() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/patients/42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let gateway = HttpGateway::new(template(&server));
        let ack = gateway.send_advice(42, "hello").await.unwrap();
        assert!(!ack.stored);
    }

    #[tokio::test]
    async fn test_send_advice_stored_false_is_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/patients/42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"stored": false})))
            .mount(&server)
            .await;

        let gateway = HttpGateway::new(template(&server));
        let ack = gateway.send_advice(42, "hello").await.unwrap();
        assert!(!ack.stored);
    }

    #[tokio::test]
    async fn test_send_advice_server_error_is_transport() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/patients/42"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let gateway = HttpGateway::new(template(&server));
        let err = gateway.send_advice(42, "hello").await.unwrap_err();
        assert!(matches!(err, GatewayError::Transport(_)), "{err:?}");
    }
}
