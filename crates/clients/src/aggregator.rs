//! [`SignatureAggregator`] over the Glacier signature aggregation API.

use std::time::Duration;

use async_trait::async_trait;
use l1_primitives::AvalancheNetwork;
use l1_validator_registration::{AggregateRequest, AggregatorError, SignatureAggregator};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

pub const DEFAULT_AGGREGATOR_URL: &str = "https://glacier-api.avax.network";
pub const DEFAULT_AGGREGATOR_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AggregateSignaturesBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    justification: Option<String>,
    signing_subnet_id: String,
    quorum_percentage: u8,
}

impl From<&AggregateRequest> for AggregateSignaturesBody {
    fn from(req: &AggregateRequest) -> Self {
        Self {
            message: hex::encode(&req.message),
            justification: req.justification.as_deref().map(hex::encode),
            signing_subnet_id: req.signing_subnet_id.to_string(),
            quorum_percentage: req.quorum_percentage,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AggregateSignaturesResponse {
    signed_message: String,
}

fn decode_signed_message(body: &str) -> Result<Vec<u8>, AggregatorError> {
    let resp: AggregateSignaturesResponse =
        serde_json::from_str(body).map_err(|e| AggregatorError::Decode(e.to_string()))?;
    let hex_str = resp.signed_message.trim_start_matches("0x");
    hex::decode(hex_str).map_err(|e| AggregatorError::Decode(format!("signedMessage: {e}")))
}

/// Aggregates signatures through `POST {base}/v1/signatureAggregator/{network}/aggregateSignatures`.
#[derive(Debug, Clone)]
pub struct HttpSignatureAggregator {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSignatureAggregator {
    pub fn new(base_url: &str, network: AvalancheNetwork) -> Result<Self, AggregatorError> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_AGGREGATOR_TIMEOUT)
            .build()
            .map_err(|e| AggregatorError::Http(e.to_string()))?;
        Ok(Self::with_client(client, base_url, network))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str, network: AvalancheNetwork) -> Self {
        Self {
            client,
            endpoint: aggregator_endpoint(base_url, network),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

pub fn aggregator_endpoint(base_url: &str, network: AvalancheNetwork) -> String {
    format!(
        "{}/v1/signatureAggregator/{}/aggregateSignatures",
        base_url.trim_end_matches('/'),
        network.aggregator_path()
    )
}

#[async_trait]
impl SignatureAggregator for HttpSignatureAggregator {
    #[instrument(skip_all, fields(subnet = %req.signing_subnet_id, len = req.message.len()))]
    async fn aggregate_signatures(&self, req: AggregateRequest) -> Result<Vec<u8>, AggregatorError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&AggregateSignaturesBody::from(&req))
            .send()
            .await
            .map_err(|e| AggregatorError::Http(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| AggregatorError::Http(e.to_string()))?;
        if !status.is_success() {
            return Err(AggregatorError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let signed = decode_signed_message(&body)?;
        debug!(len = signed.len(), "received aggregated signature");
        Ok(signed)
    }
}

#[cfg(test)]
mod tests {
    use l1_primitives::SubnetId;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_endpoint() {
        assert_eq!(
            aggregator_endpoint("https://glacier-api.avax.network/", AvalancheNetwork::Fuji),
            "https://glacier-api.avax.network/v1/signatureAggregator/fuji/aggregateSignatures"
        );
    }

    #[test]
    fn test_request_body() {
        let req = AggregateRequest {
            message: vec![0xde, 0xad],
            justification: None,
            signing_subnet_id: SubnetId::new([0; 32]),
            quorum_percentage: 67,
        };
        let body = serde_json::to_value(AggregateSignaturesBody::from(&req)).unwrap();
        assert_eq!(
            body,
            json!({
                "message": "dead",
                "signingSubnetId": "11111111111111111111111111111111LpoYY",
                "quorumPercentage": 67
            })
        );

        let req = AggregateRequest {
            justification: Some(vec![1]),
            ..req
        };
        let body = serde_json::to_value(AggregateSignaturesBody::from(&req)).unwrap();
        assert_eq!(body["justification"], "01");
    }

    #[test]
    fn test_response_decoding() {
        assert_eq!(
            decode_signed_message(r#"{"signedMessage":"0x0102"}"#).unwrap(),
            vec![1, 2]
        );
        assert_eq!(
            decode_signed_message(r#"{"signedMessage":"ff"}"#).unwrap(),
            vec![0xff]
        );
        assert!(matches!(
            decode_signed_message(r#"{"signedMessage":"zz"}"#),
            Err(AggregatorError::Decode(_))
        ));
        assert!(matches!(
            decode_signed_message(r#"{"error":"quorum not reached"}"#),
            Err(AggregatorError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        let agg = HttpSignatureAggregator::new("http://127.0.0.1:1", AvalancheNetwork::Fuji).unwrap();
        let err = agg
            .aggregate_signatures(AggregateRequest {
                message: vec![1],
                justification: None,
                signing_subnet_id: SubnetId::new([0; 32]),
                quorum_percentage: 67,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AggregatorError::Http(_)));
    }
}
