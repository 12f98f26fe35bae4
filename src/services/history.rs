use crate::errors::ClientError;
use crate::models::{Access, Booking};
use crate::services::api::BackendApi;
use crate::services::session::SessionProvider;

pub const MY_BOOKINGS_FAILED_MESSAGE: &str = "Failed to fetch bookings.";

/// The signed-in customer's past and upcoming bookings, newest date first.
pub async fn my_bookings(api: &dyn BackendApi, session: &SessionProvider) -> Result<Vec<Booking>, ClientError> {
    session.authorize(Access::Customer)?;
    let token = session
        .token()
        .ok_or_else(|| ClientError::Auth("Please log in to view your bookings.".to_string()))?;

    let mut bookings = api.my_bookings(&token).await?;
    bookings.sort_by(|a, b| b.date_naive().cmp(&a.date_naive()).then_with(|| a.time.cmp(&b.time)));
    Ok(bookings)
}
