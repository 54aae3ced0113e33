//! HTTP client for the mosparo API.

use chrono::NaiveDate;
use mosparo_core::{
    FormData, HEALTH_CHECK_API_ENDPOINT, HealthCheckResult, MosparoConfig, MosparoError,
    RequestSigner, STATISTIC_BY_DATE_API_ENDPOINT, StatisticResult, VERIFICATION_API_ENDPOINT,
    VerificationResult, validate_verification,
};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ClientError, ClientResult};

const JSON_MEDIA_TYPE: &str = "application/json";
const JSON_UTF8_MEDIA_TYPE: &str = "application/json; charset=utf-8";

/// Client for one mosparo project.
///
/// Cheap to clone: the underlying `reqwest::Client` shares its connection pool.
#[derive(Debug, Clone)]
pub struct MosparoClient {
    base_url: String,
    http: reqwest::Client,
    signer: RequestSigner,
}

impl MosparoClient {
    /// Create a client with its own HTTP connection pool.
    pub fn new(config: &MosparoConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Self::with_http_client(config, http)
    }

    /// Create a client on top of a preconfigured `reqwest::Client`.
    pub fn with_http_client(config: &MosparoConfig, http: reqwest::Client) -> ClientResult<Self> {
        let signer = RequestSigner::from_credentials(&config.credentials)?;
        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_owned(),
            http,
            signer,
        })
    }

    /// Signer used for this project's requests.
    #[must_use]
    pub fn signer(&self) -> &RequestSigner {
        &self.signer
    }

    /// Verify a form submission without checking field coverage.
    ///
    /// Prefer [`verify_submission_with_required_fields`](Self::verify_submission_with_required_fields):
    /// without it a field removed from the server's view in the browser goes
    /// unnoticed.
    pub async fn verify_submission(&self, form: &FormData) -> ClientResult<VerificationResult> {
        self.verify(form, &[]).await
    }

    /// Verify a form submission and ensure every field in `required_fields`
    /// was evaluated by the server.
    ///
    /// `required_fields` should list every field that accepts user input.
    pub async fn verify_submission_with_required_fields(
        &self,
        form: &FormData,
        required_fields: &[&str],
    ) -> ClientResult<VerificationResult> {
        if required_fields.is_empty() {
            return Err(MosparoError::EmptyRequiredFields.into());
        }
        self.verify(form, required_fields).await
    }

    async fn verify(&self, form: &FormData, required_fields: &[&str]) -> ClientResult<VerificationResult> {
        let request = self.signer.build_verification_request(form)?;
        let body = serde_json::to_string(&request).map_err(MosparoError::from)?;

        let http_request = self.signed(
            self.http.post(self.url(VERIFICATION_API_ENDPOINT)),
            VERIFICATION_API_ENDPOINT,
            &body,
        );
        let result: VerificationResult = execute(http_request.body(body)).await?;

        Ok(validate_verification(&request, result, required_fields)?)
    }

    /// Numbers of valid and spam submissions per day.
    ///
    /// `range` is the number of seconds to look back (values below 1 are sent
    /// as `0`); without it the server uses its default window. `start_date`
    /// limits the result to days from that date on.
    pub async fn statistic_by_date(
        &self,
        range: Option<i64>,
        start_date: Option<NaiveDate>,
    ) -> ClientResult<StatisticResult> {
        let mut url = self.url(STATISTIC_BY_DATE_API_ENDPOINT);
        let query = statistic_query(range, start_date);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }

        let http_request = self.signed(
            self.http.get(url),
            STATISTIC_BY_DATE_API_ENDPOINT,
            mosparo_core::EMPTY_BODY,
        );
        let result: StatisticResult = execute(http_request).await?;

        if result.has_error() {
            return Err(MosparoError::Rejected(result.error_message.unwrap_or_default()).into());
        }
        Ok(result)
    }

    /// Health status of the mosparo server.
    pub async fn health_check(&self) -> ClientResult<HealthCheckResult> {
        let http_request = self.signed(
            self.http.get(self.url(HEALTH_CHECK_API_ENDPOINT)),
            HEALTH_CHECK_API_ENDPOINT,
            mosparo_core::EMPTY_BODY,
        );
        execute(http_request).await
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }

    /// Attach content negotiation and the signed `Authorization` header.
    fn signed(&self, builder: RequestBuilder, endpoint: &str, body: &str) -> RequestBuilder {
        builder
            .header(ACCEPT, JSON_MEDIA_TYPE)
            .header(CONTENT_TYPE, JSON_UTF8_MEDIA_TYPE)
            .header(AUTHORIZATION, self.signer.auth_header(endpoint, body))
    }
}

/// Send a request and decode a `200 OK` JSON body.
async fn execute<T: DeserializeOwned>(builder: RequestBuilder) -> ClientResult<T> {
    let response = builder.send().await?;
    let status = response.status();
    debug!(url = %response.url(), %status, "mosparo API responded");

    if status != StatusCode::OK {
        return Err(ClientError::Status(status));
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|source| ClientError::InvalidResponse { source })
}

/// Query string of the statistics endpoint.
fn statistic_query(range: Option<i64>, start_date: Option<NaiveDate>) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    if let Some(range) = range {
        query.append_pair("range", &range.max(0).to_string());
    }
    if let Some(date) = start_date {
        query.append_pair("startDate", &date.format("%Y-%m-%d").to_string());
    }
    query.finish()
}
