//! HTTP client for the external tariff calculation API.

use super::request::TariffRequest;
use crate::error::{Result, TariffError};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{info, instrument};
use url::Url;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Result of a tariff calculation: the payload that was sent and the
/// downstream response body, untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TariffCalculation {
    pub inputs: TariffRequest,
    pub result: Value,
}

/// Client for the tariff calculation endpoint.
#[derive(Clone)]
pub struct TariffClient {
    http: reqwest::Client,
    url: Url,
}

impl TariffClient {
    /// Create a client posting to `url` with the default 60 second timeout.
    pub fn new(url: Url) -> Result<Self> {
        Self::with_timeout(url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(url: Url, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| TariffError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { http, url })
    }

    /// POST the request and wrap the response with the inputs.
    ///
    /// Non-2xx responses are errors. Nothing is retried.
    #[instrument(skip(self, request), fields(hts8 = %request.hts8))]
    pub async fn calculate(&self, request: &TariffRequest) -> Result<TariffCalculation> {
        info!(
            "[calculate_tariff] Calling tariff API with: {}",
            serde_json::to_string(request)?
        );

        let response = self.http.post(self.url.clone()).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TariffError::TariffApi {
                status: status.as_u16(),
                body,
            });
        }

        let result: Value = response.json().await?;
        Ok(TariffCalculation {
            inputs: request.clone(),
            result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tariff::TransportMode;
    use serde_json::json;
    use std::io::Write;

    fn request() -> TariffRequest {
        TariffRequest {
            hts8: "64039990".to_string(),
            item_value: 100.0,
            item_quantity: 1,
            origin_country: "CN".to_string(),
            country_of_arrival: "US".to_string(),
            mode_of_transport: TransportMode::Sea,
            entry_date: "2024-01-01".to_string(),
            loading_date: "2023-12-01".to_string(),
        }
    }

    fn client_for(server: &mockito::Server) -> TariffClient {
        let url = Url::parse(&format!("{}/api/tariff/calculate", server.url())).unwrap();
        TariffClient::new(url).unwrap()
    }

    #[tokio::test]
    async fn test_successful_calculation() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/tariff/calculate")
            .match_header("content-type", "application/json")
            .match_header("accept", "application/json")
            .match_body(mockito::Matcher::Json(json!({
                "hts8": "64039990",
                "itemValue": 100.0,
                "itemQuantity": 1,
                "originCountry": "CN",
                "countryOfArrival": "US",
                "modeOfTransport": "sea",
                "entryDate": "2024-01-01",
                "loadingDate": "2023-12-01"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"duty": 12.5, "tax": 3.0}"#)
            .create_async()
            .await;

        let calculation = client_for(&server).calculate(&request()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(calculation.inputs, request());
        assert_eq!(calculation.result, json!({"duty": 12.5, "tax": 3.0}));
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/tariff/calculate")
            .with_status(422)
            .with_body("unknown hts8")
            .expect(1)
            .create_async()
            .await;

        let err = client_for(&server).calculate(&request()).await.unwrap_err();

        mock.assert_async().await;
        match err {
            TariffError::TariffApi { status, body } => {
                assert_eq!(status, 422);
                assert_eq!(body, "unknown hts8");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_non_json_body_is_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/tariff/calculate")
            .with_status(200)
            .with_body("<html>oops</html>")
            .create_async()
            .await;

        let err = client_for(&server).calculate(&request()).await.unwrap_err();
        assert!(matches!(err, TariffError::Http(_)));
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/tariff/calculate")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_chunked_body(|w| {
                std::thread::sleep(Duration::from_millis(1500));
                w.write_all(br#"{"duty": 0}"#)
            })
            .expect(1)
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/api/tariff/calculate", server.url())).unwrap();
        let client = TariffClient::with_timeout(url, Duration::from_millis(100)).unwrap();
        let err = client.calculate(&request()).await.unwrap_err();

        mock.assert_async().await;
        match err {
            TariffError::Http(e) => assert!(e.is_timeout(), "expected a timeout, got {}", e),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_calculation_serializes_inputs_and_result() {
        let calculation = TariffCalculation {
            inputs: request(),
            result: json!({"duty": 1}),
        };
        let value = serde_json::to_value(&calculation).unwrap();
        assert_eq!(value["inputs"]["modeOfTransport"], "sea");
        assert_eq!(value["result"]["duty"], 1);
    }
}
