//! Attendance backend HTTP client.

use std::future::Future;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::bulk::BulkUpdateRequest;
use crate::config::ApiConfig;
use crate::error::{AppError, Result};
use crate::models::{AttendanceRecord, AttendanceStatistics, Employee, Location, TaskReport};

/// Data-access operations the views depend on.
pub trait AttendanceApi {
    /// Full record set for one employee and date range.
    fn fetch_attendance(
        &self,
        employee_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> impl Future<Output = Result<Vec<AttendanceRecord>>> + Send;

    /// Backend-computed summary for the same range.
    fn fetch_statistics(
        &self,
        employee_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> impl Future<Output = Result<AttendanceStatistics>> + Send;

    fn check_in(&self, location: Option<Location>) -> impl Future<Output = Result<AttendanceRecord>> + Send;

    fn check_out(&self, location: Option<Location>) -> impl Future<Output = Result<AttendanceRecord>> + Send;

    fn submit_task_report(&self, report: &TaskReport) -> impl Future<Output = Result<()>> + Send;

    fn update_attendance(&self, request: &BulkUpdateRequest) -> impl Future<Output = Result<()>> + Send;

    fn list_employees(&self) -> impl Future<Output = Result<Vec<Employee>>> + Send;
}

/// Body for check-in and check-out.
#[derive(Debug, Serialize)]
struct CheckBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    longitude: Option<f64>,
}

impl CheckBody {
    fn from_location(location: Option<Location>) -> Self {
        match location.and_then(|l| l.coordinates()) {
            Some((latitude, longitude)) => Self {
                latitude: Some(latitude),
                longitude: Some(longitude),
            },
            None => Self {
                latitude: None,
                longitude: None,
            },
        }
    }
}

/// REST client for the attendance backend.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: String,
}

impl ApiClient {
    /// Create a client from API settings.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.normalized_base_url().to_string(),
            token: config.token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{base}{path}", base = self.base_url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        if self.token.is_empty() {
            request
        } else {
            request.bearer_auth(&self.token)
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        debug!("GET {path}");
        let response = self
            .authorize(self.client.get(self.url(path)).query(query))
            .send()
            .await?;
        decode(ensure_success(response).await?).await
    }

    async fn send_json<B: Serialize + ?Sized>(&self, request: RequestBuilder, body: &B) -> Result<Response> {
        let response = self.authorize(request.json(body)).send().await?;
        ensure_success(response).await
    }

    /// Plain reachability check against the base URL.
    pub async fn test_connection(&self) -> Result<bool> {
        let response = self.authorize(self.client.get(self.url("/"))).send().await?;
        Ok(!response.status().is_server_error())
    }
}

fn range_query(employee_id: &str, start_date: NaiveDate, end_date: NaiveDate) -> Vec<(&'static str, String)> {
    vec![
        ("employeeId", employee_id.to_string()),
        ("startDate", start_date.format("%Y-%m-%d").to_string()),
        ("endDate", end_date.format("%Y-%m-%d").to_string()),
    ]
}

/// Turn non-2xx responses into `AppError::Api`, keeping the server's message.
async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(AppError::api(status.as_u16(), error_message(&body, status.as_str())))
}

fn error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_string()))
        .unwrap_or_else(|| fallback.to_string())
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let text = response.text().await?;
    parse_payload(&text)
}

/// Accept both bare payloads and `{ "data": ... }` envelopes.
fn parse_payload<T: DeserializeOwned>(text: &str) -> Result<T> {
    let value: Value = serde_json::from_str(text)?;
    let inner = match value {
        Value::Object(mut map) if map.contains_key("data") => map.remove("data").unwrap_or(Value::Null),
        other => other,
    };
    Ok(serde_json::from_value(inner)?)
}

impl AttendanceApi for ApiClient {
    async fn fetch_attendance(
        &self,
        employee_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>> {
        self.get_json("/attendance", &range_query(employee_id, start_date, end_date))
            .await
    }

    async fn fetch_statistics(
        &self,
        employee_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<AttendanceStatistics> {
        self.get_json("/attendance/statistics", &range_query(employee_id, start_date, end_date))
            .await
    }

    async fn check_in(&self, location: Option<Location>) -> Result<AttendanceRecord> {
        let request = self.client.post(self.url("/attendance/check-in"));
        let response = self.send_json(request, &CheckBody::from_location(location)).await?;
        decode(response).await
    }

    async fn check_out(&self, location: Option<Location>) -> Result<AttendanceRecord> {
        let request = self.client.post(self.url("/attendance/check-out"));
        let response = self.send_json(request, &CheckBody::from_location(location)).await?;
        decode(response).await
    }

    async fn submit_task_report(&self, report: &TaskReport) -> Result<()> {
        report.validate()?;
        let request = self.client.post(self.url("/task-reports"));
        self.send_json(request, report).await?;
        Ok(())
    }

    async fn update_attendance(&self, request: &BulkUpdateRequest) -> Result<()> {
        let path = format!("/attendance/{id}", id = request.record_id);
        let builder = self.client.put(self.url(&path));
        self.send_json(builder, request).await?;
        Ok(())
    }

    async fn list_employees(&self) -> Result<Vec<Employee>> {
        self.get_json("/employees", &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_array() {
        let records: Vec<AttendanceRecord> =
            parse_payload(r#"[{ "id": "a", "date": "2024-03-01" }, { "id": "b", "date": "2024-03-02" }]"#).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].id, "b");
    }

    #[test]
    fn test_parse_data_envelope() {
        let records: Vec<AttendanceRecord> =
            parse_payload(r#"{ "success": true, "data": [{ "id": "a", "date": "2024-03-01" }] }"#).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_parse_invalid_json() {
        let result: Result<Vec<AttendanceRecord>> = parse_payload("<html>");
        assert!(matches!(result, Err(AppError::Json(_))));
    }

    #[test]
    fn test_error_message_prefers_server_message() {
        assert_eq!(error_message(r#"{ "message": "Record locked" }"#, "Conflict"), "Record locked");
        assert_eq!(error_message(r#"{ "error": "Forbidden" }"#, "403"), "Forbidden");
        assert_eq!(error_message("gateway down", "502"), "gateway down");
        assert_eq!(error_message("   ", "Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn test_range_query_format() {
        let query = range_query(
            "emp-1",
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        );
        assert_eq!(query[0], ("employeeId", "emp-1".to_string()));
        assert_eq!(query[1], ("startDate", "2024-03-01".to_string()));
        assert_eq!(query[2], ("endDate", "2024-03-31".to_string()));
    }

    #[test]
    fn test_check_body_drops_invalid_location() {
        let body = serde_json::to_value(CheckBody::from_location(Some(Location::new(f64::NAN, 1.0)))).unwrap();
        assert_eq!(body, serde_json::json!({}));

        let body = serde_json::to_value(CheckBody::from_location(Some(Location::new(1.5, 2.5)))).unwrap();
        assert_eq!(body, serde_json::json!({ "latitude": 1.5, "longitude": 2.5 }));
    }

    #[test]
    fn test_client_strips_trailing_slash() {
        let config = ApiConfig {
            base_url: "http://localhost:5000/api/".to_string(),
            ..Default::default()
        };
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.url("/employees"), "http://localhost:5000/api/employees");
    }
}
