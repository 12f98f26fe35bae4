use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::BackendApi;
use crate::errors::ClientError;
use crate::models::{
    AuthResponse, Booking, BookingStatus, MessageResponse, NewBooking, NewService, Role, Service,
    User,
};

/// In-memory backend double. Every call is recorded by name; `fail_with`
/// and `offline` make the next calls fail the way HTTP would.
#[derive(Default)]
pub struct MockBackend {
    pub services: Mutex<Vec<Service>>,
    pub booked: Mutex<HashMap<(String, String), Vec<String>>>,
    pub bookings: Mutex<Vec<Booking>>,
    pub tokens: Mutex<HashMap<String, User>>,
    /// email -> (password, token)
    pub accounts: Mutex<HashMap<String, (String, String)>>,
    pub admin_password: Mutex<Option<(String, String)>>,
    pub created: Mutex<Vec<(Option<String>, NewBooking)>>,
    pub calls: Mutex<Vec<String>>,
    pub fail_with: Mutex<Option<(u16, Option<String>)>>,
    pub fail_on: Mutex<HashMap<String, (u16, Option<String>)>>,
    pub offline: Mutex<bool>,
}

pub fn service(id: &str, name: &str) -> Service {
    Service {
        id: id.to_string(),
        name: name.to_string(),
        description: String::new(),
        price: 499.0,
        duration: 60,
    }
}

pub fn user(email: &str, role: Role) -> User {
    User {
        id: Some(format!("id-{email}")),
        name: None,
        email: Some(email.to_string()),
        role,
    }
}

pub fn message(text: &str) -> MessageResponse {
    MessageResponse {
        msg: Some(text.to_string()),
        message: None,
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_services(self, services: Vec<Service>) -> Self {
        *self.services.lock().unwrap() = services;
        self
    }

    pub fn with_booked(self, service_id: &str, date: &str, times: &[&str]) -> Self {
        self.booked.lock().unwrap().insert(
            (service_id.to_string(), date.to_string()),
            times.iter().map(|t| t.to_string()).collect(),
        );
        self
    }

    pub fn with_token(self, token: &str, user: User) -> Self {
        self.tokens.lock().unwrap().insert(token.to_string(), user);
        self
    }

    pub fn with_account(self, email: &str, password: &str, token: &str, role: Role) -> Self {
        self.accounts.lock().unwrap().insert(
            email.to_string(),
            (password.to_string(), token.to_string()),
        );
        self.with_token(token, user(email, role))
    }

    pub fn with_admin_password(self, password: &str, token: &str) -> Self {
        *self.admin_password.lock().unwrap() = Some((password.to_string(), token.to_string()));
        self.with_token(token, user("admin@coolcare.in", Role::Admin))
    }

    pub fn with_bookings(self, bookings: Vec<Booking>) -> Self {
        *self.bookings.lock().unwrap() = bookings;
        self
    }

    pub fn fail_next(&self, status: u16, message: Option<&str>) {
        *self.fail_with.lock().unwrap() = Some((status, message.map(str::to_string)));
    }

    /// Fail the next call named `name`, leaving other calls alone.
    pub fn fail_on(&self, name: &str, status: u16, message: Option<&str>) {
        self.fail_on
            .lock()
            .unwrap()
            .insert(name.to_string(), (status, message.map(str::to_string)));
    }

    pub fn set_offline(&self, offline: bool) {
        *self.offline.lock().unwrap() = offline;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == name).count()
    }

    fn enter(&self, name: &str) -> Result<(), ClientError> {
        self.calls.lock().unwrap().push(name.to_string());
        if *self.offline.lock().unwrap() {
            return Err(ClientError::Network("connection refused".to_string()));
        }
        if let Some((status, message)) = self.fail_with.lock().unwrap().take() {
            return Err(ClientError::Backend { status, message });
        }
        if let Some((status, message)) = self.fail_on.lock().unwrap().remove(name) {
            return Err(ClientError::Backend { status, message });
        }
        Ok(())
    }

    fn require_admin(&self, token: &str) -> Result<(), ClientError> {
        match self.tokens.lock().unwrap().get(token) {
            Some(u) if u.role == Role::Admin => Ok(()),
            _ => Err(ClientError::Backend {
                status: 403,
                message: Some("Access denied".to_string()),
            }),
        }
    }
}

fn invalid_credentials() -> ClientError {
    ClientError::Backend {
        status: 400,
        message: Some("Invalid credentials".to_string()),
    }
}

#[async_trait]
impl BackendApi for MockBackend {
    async fn list_services(&self) -> Result<Vec<Service>, ClientError> {
        self.enter("list_services")?;
        Ok(self.services.lock().unwrap().clone())
    }

    async fn booked_times(&self, service_id: &str, date: &str) -> Result<Vec<String>, ClientError> {
        self.enter("booked_times")?;
        Ok(self
            .booked
            .lock()
            .unwrap()
            .get(&(service_id.to_string(), date.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn create_booking(
        &self,
        token: Option<&str>,
        booking: &NewBooking,
    ) -> Result<MessageResponse, ClientError> {
        self.enter("create_booking")?;
        self.created
            .lock()
            .unwrap()
            .push((token.map(str::to_string), booking.clone()));
        self.booked
            .lock()
            .unwrap()
            .entry((booking.service_id.clone(), booking.date.clone()))
            .or_default()
            .push(booking.time.clone());
        Ok(message("Booking created"))
    }

    async fn my_bookings(&self, token: &str) -> Result<Vec<Booking>, ClientError> {
        self.enter("my_bookings")?;
        let user_id = self
            .tokens
            .lock()
            .unwrap()
            .get(token)
            .and_then(|u| u.id.clone())
            .ok_or(ClientError::Backend {
                status: 401,
                message: Some("Token is not valid".to_string()),
            })?;
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.user_id.as_deref() == Some(user_id.as_str()))
            .cloned()
            .collect())
    }

    async fn admin_bookings(&self, token: &str) -> Result<Vec<Booking>, ClientError> {
        self.enter("admin_bookings")?;
        self.require_admin(token)?;
        Ok(self.bookings.lock().unwrap().clone())
    }

    async fn admin_services(&self, token: &str) -> Result<Vec<Service>, ClientError> {
        self.enter("admin_services")?;
        self.require_admin(token)?;
        Ok(self.services.lock().unwrap().clone())
    }

    async fn add_service(&self, token: &str, new: &NewService) -> Result<MessageResponse, ClientError> {
        self.enter("add_service")?;
        self.require_admin(token)?;
        let mut services = self.services.lock().unwrap();
        let id = format!("svc{}", services.len() + 1);
        services.push(Service {
            id,
            name: new.name.clone(),
            description: new.description.clone(),
            price: new.price,
            duration: new.duration,
        });
        Ok(message("Service added"))
    }

    async fn delete_service(&self, token: &str, service_id: &str) -> Result<MessageResponse, ClientError> {
        self.enter("delete_service")?;
        self.require_admin(token)?;
        self.services.lock().unwrap().retain(|s| s.id != service_id);
        Ok(message("Service deleted"))
    }

    async fn update_booking_status(
        &self,
        token: &str,
        booking_id: &str,
        status: BookingStatus,
    ) -> Result<MessageResponse, ClientError> {
        self.enter("update_booking_status")?;
        self.require_admin(token)?;
        let mut bookings = self.bookings.lock().unwrap();
        match bookings.iter_mut().find(|b| b.id == booking_id) {
            Some(b) => {
                b.status = status;
                Ok(message("Status updated"))
            }
            None => Err(ClientError::Backend {
                status: 404,
                message: Some("Booking not found".to_string()),
            }),
        }
    }

    async fn delete_booking(&self, token: &str, booking_id: &str) -> Result<MessageResponse, ClientError> {
        self.enter("delete_booking")?;
        self.require_admin(token)?;
        self.bookings.lock().unwrap().retain(|b| b.id != booking_id);
        Ok(message("Booking deleted"))
    }

    async fn signup(&self, _name: &str, email: &str, _password: &str) -> Result<MessageResponse, ClientError> {
        self.enter("signup")?;
        Ok(message(&format!("OTP sent to {email}")))
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        self.enter("login")?;
        let (expected, token) = self
            .accounts
            .lock()
            .unwrap()
            .get(email)
            .cloned()
            .ok_or_else(invalid_credentials)?;
        if expected != password {
            return Err(invalid_credentials());
        }
        let user = self
            .tokens
            .lock()
            .unwrap()
            .get(&token)
            .cloned()
            .unwrap_or_default();
        Ok(AuthResponse { token, user })
    }

    async fn admin_pass_login(&self, password: &str) -> Result<AuthResponse, ClientError> {
        self.enter("admin_pass_login")?;
        let (expected, token) = self
            .admin_password
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(invalid_credentials)?;
        if expected != password {
            return Err(ClientError::Backend {
                status: 401,
                message: None,
            });
        }
        let user = self
            .tokens
            .lock()
            .unwrap()
            .get(&token)
            .cloned()
            .unwrap_or_default();
        Ok(AuthResponse { token, user })
    }

    async fn verify_otp(&self, _email: &str, otp: &str) -> Result<MessageResponse, ClientError> {
        self.enter("verify_otp")?;
        if otp == "123456" {
            Ok(message("Email verified"))
        } else {
            Err(ClientError::Backend {
                status: 400,
                message: Some("Invalid OTP".to_string()),
            })
        }
    }

    async fn send_reset_otp(&self, _email: &str) -> Result<MessageResponse, ClientError> {
        self.enter("send_reset_otp")?;
        Ok(message("Reset code sent"))
    }

    async fn verify_reset_otp(&self, _email: &str, otp: &str) -> Result<MessageResponse, ClientError> {
        self.enter("verify_reset_otp")?;
        if otp == "123456" {
            Ok(message("Code verified"))
        } else {
            Err(ClientError::Backend {
                status: 400,
                message: Some("Invalid or expired code".to_string()),
            })
        }
    }

    async fn update_password(&self, _email: &str, _password: &str) -> Result<MessageResponse, ClientError> {
        self.enter("update_password")?;
        Ok(message("Password updated"))
    }

    async fn reset_password(&self, _reset_token: &str, _password: &str) -> Result<MessageResponse, ClientError> {
        self.enter("reset_password")?;
        Ok(message("Password reset"))
    }

    async fn me(&self, token: &str) -> Result<User, ClientError> {
        self.enter("me")?;
        self.tokens
            .lock()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or_else(|| ClientError::Auth("Token is not valid".to_string()))
    }
}
