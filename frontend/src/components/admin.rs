pub mod announcements;
pub mod contacts;
pub mod notifications;
pub mod requests;
pub mod users;
