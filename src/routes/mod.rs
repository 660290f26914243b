mod admin;
mod booking;
mod contact;
mod health_check;
mod subscriptions;
mod trusted_by;

pub use admin::*;
pub use booking::*;
pub use contact::*;
pub use health_check::*;
pub use subscriptions::*;
pub use trusted_by::*;
