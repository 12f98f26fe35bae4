pub mod availability;
pub mod booking;
pub mod notice;
pub mod password_reset;
pub mod service;
pub mod session;
pub mod user;

pub use availability::{canonical_time, WorkingHours};
pub use booking::{Booking, BookingForm, BookingStatus, NewBooking, ServiceRef};
pub use notice::Notice;
pub use password_reset::PasswordResetStep;
pub use service::{NewService, Service};
pub use session::{Access, Identity, SessionEvent, SessionKind, SessionState};
pub use user::{AuthResponse, MessageResponse, Role, User};
