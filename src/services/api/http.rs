use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use super::BackendApi;
use crate::errors::ClientError;
use crate::models::{
    AuthResponse, Booking, BookingStatus, MessageResponse, NewBooking, NewService, Service, User,
};

const AUTH_HEADER: &str = "x-auth-token";

#[derive(Deserialize)]
struct BookedTimesResponse {
    #[serde(rename = "bookedTimes", default)]
    booked_times: Vec<String>,
}

#[derive(Deserialize)]
struct MeResponse {
    user: User,
}

/// [`BackendApi`] over the CoolCare REST API.
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let req = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match token {
            Some(token) => req.header(AUTH_HEADER, token),
            None => req,
        }
    }

    /// Run the request and return the body of a 2xx response. Anything else
    /// becomes `Backend { status, message }`.
    async fn fetch(&self, method: &str, path: &str, req: RequestBuilder) -> Result<(u16, String), ClientError> {
        tracing::debug!(method, path, "backend request");

        let resp = req.send().await.map_err(|e| {
            tracing::warn!(method, path, error = %e, "backend unreachable");
            ClientError::from(e)
        })?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| {
            tracing::warn!(method, path, error = %e, "failed to read backend response");
            ClientError::from(e)
        })?;

        if !status.is_success() {
            let message = serde_json::from_str::<MessageResponse>(&text)
                .ok()
                .and_then(|m| m.text().map(str::to_string));
            tracing::warn!(
                method,
                path,
                status = status.as_u16(),
                message = message.as_deref().unwrap_or(""),
                "backend returned error"
            );
            return Err(ClientError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        Ok((status.as_u16(), text))
    }

    /// Typed read: the body must decode into `T`.
    async fn send<T: DeserializeOwned>(
        &self,
        method: &str,
        path: &str,
        req: RequestBuilder,
    ) -> Result<T, ClientError> {
        let (status, text) = self.fetch(method, path, req).await?;
        let body = if text.trim().is_empty() { "{}" } else { text.as_str() };
        serde_json::from_str(body).map_err(|e| {
            tracing::warn!(method, path, error = %e, "failed to parse backend response");
            ClientError::Backend {
                status,
                message: None,
            }
        })
    }

    /// Command endpoints: any 2xx is success, whatever the body looks like.
    async fn command(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&serde_json::Value>,
    ) -> Result<MessageResponse, ClientError> {
        let mut req = self.request(method.clone(), path, token);
        if let Some(body) = body {
            req = req.json(body);
        }
        let (_, text) = self.fetch(method.as_str(), path, req).await?;
        Ok(parse_message(&text))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, token: Option<&str>) -> Result<T, ClientError> {
        let req = self.request(Method::GET, path, token);
        self.send("GET", path, req).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &serde_json::Value,
    ) -> Result<T, ClientError> {
        let req = self.request(Method::POST, path, token).json(body);
        self.send("POST", path, req).await
    }
}

#[async_trait]
impl BackendApi for HttpBackend {
    async fn list_services(&self) -> Result<Vec<Service>, ClientError> {
        self.get("/services", None).await
    }

    async fn booked_times(&self, service_id: &str, date: &str) -> Result<Vec<String>, ClientError> {
        let path = "/bookings/available-slots";
        let req = self
            .request(Method::GET, path, None)
            .query(&[("serviceId", service_id), ("date", date)]);
        let resp: BookedTimesResponse = self.send("GET", path, req).await?;
        Ok(resp.booked_times)
    }

    async fn create_booking(
        &self,
        token: Option<&str>,
        booking: &NewBooking,
    ) -> Result<MessageResponse, ClientError> {
        let body = serde_json::to_value(booking)
            .map_err(|e| ClientError::Config(format!("failed to encode booking: {e}")))?;
        self.command(Method::POST, "/bookings", token, Some(&body)).await
    }

    async fn my_bookings(&self, token: &str) -> Result<Vec<Booking>, ClientError> {
        self.get("/bookings/my", Some(token)).await
    }

    async fn admin_bookings(&self, token: &str) -> Result<Vec<Booking>, ClientError> {
        self.get("/admin/bookings", Some(token)).await
    }

    async fn admin_services(&self, token: &str) -> Result<Vec<Service>, ClientError> {
        self.get("/admin/services", Some(token)).await
    }

    async fn add_service(&self, token: &str, service: &NewService) -> Result<MessageResponse, ClientError> {
        let body = serde_json::to_value(service)
            .map_err(|e| ClientError::Config(format!("failed to encode service: {e}")))?;
        self.command(Method::POST, "/admin/services", Some(token), Some(&body))
            .await
    }

    async fn delete_service(&self, token: &str, service_id: &str) -> Result<MessageResponse, ClientError> {
        self.command(Method::DELETE, &format!("/admin/services/{service_id}"), Some(token), None)
            .await
    }

    async fn update_booking_status(
        &self,
        token: &str,
        booking_id: &str,
        status: BookingStatus,
    ) -> Result<MessageResponse, ClientError> {
        self.command(
            Method::PUT,
            &format!("/admin/bookings/{booking_id}/status"),
            Some(token),
            Some(&json!({ "status": status.as_str() })),
        )
        .await
    }

    async fn delete_booking(&self, token: &str, booking_id: &str) -> Result<MessageResponse, ClientError> {
        self.command(Method::DELETE, &format!("/admin/bookings/{booking_id}"), Some(token), None)
            .await
    }

    async fn signup(&self, name: &str, email: &str, password: &str) -> Result<MessageResponse, ClientError> {
        self.command(
            Method::POST,
            "/auth/signup",
            None,
            Some(&json!({ "name": name, "email": email, "password": password })),
        )
        .await
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        self.post(
            "/auth/login",
            None,
            &json!({ "email": email, "password": password }),
        )
        .await
    }

    async fn admin_pass_login(&self, password: &str) -> Result<AuthResponse, ClientError> {
        self.post("/auth/admin-pass-login", None, &json!({ "password": password }))
            .await
    }

    async fn verify_otp(&self, email: &str, otp: &str) -> Result<MessageResponse, ClientError> {
        self.command(
            Method::POST,
            "/auth/verify-otp",
            None,
            Some(&json!({ "email": email, "otp": otp })),
        )
        .await
    }

    async fn send_reset_otp(&self, email: &str) -> Result<MessageResponse, ClientError> {
        self.command(
            Method::POST,
            "/auth/send-reset-otp",
            None,
            Some(&json!({ "email": email })),
        )
        .await
    }

    async fn verify_reset_otp(&self, email: &str, otp: &str) -> Result<MessageResponse, ClientError> {
        self.command(
            Method::POST,
            "/auth/verify-reset-otp",
            None,
            Some(&json!({ "email": email, "otp": otp })),
        )
        .await
    }

    async fn update_password(&self, email: &str, password: &str) -> Result<MessageResponse, ClientError> {
        self.command(
            Method::POST,
            "/auth/update-password",
            None,
            Some(&json!({ "email": email, "password": password })),
        )
        .await
    }

    async fn reset_password(&self, reset_token: &str, password: &str) -> Result<MessageResponse, ClientError> {
        self.command(
            Method::POST,
            &format!("/auth/reset-password/{reset_token}"),
            None,
            Some(&json!({ "password": password })),
        )
        .await
    }

    async fn me(&self, token: &str) -> Result<User, ClientError> {
        match self.get::<MeResponse>("/auth/me", Some(token)).await {
            Ok(resp) => Ok(resp.user),
            Err(ClientError::Backend { status, message }) if is_rejection(status) => Err(
                ClientError::Auth(message.unwrap_or_else(|| "token rejected".to_string())),
            ),
            Err(e) => Err(e),
        }
    }
}

/// Only 401/403 on the identity check mean the stored credential is no
/// good. A 404 or 429 says nothing about the token.
fn is_rejection(status: u16) -> bool {
    matches!(status, 401 | 403)
}

/// Decode a 2xx command body. Plain text is taken as the message itself.
fn parse_message(text: &str) -> MessageResponse {
    let text = text.trim();
    if text.is_empty() {
        return MessageResponse::default();
    }
    if let Ok(resp) = serde_json::from_str::<MessageResponse>(text) {
        return resp;
    }
    let msg = serde_json::from_str::<String>(text).unwrap_or_else(|_| text.to_string());
    MessageResponse {
        msg: Some(msg),
        message: None,
    }
}
