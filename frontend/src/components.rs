pub mod admin;
pub mod confirm;
pub mod navbar;
pub mod toast_view;
