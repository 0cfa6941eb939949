pub mod about;
pub mod admin_dash;
pub mod admin_login;
pub mod expert_dash;
pub mod login;
pub mod main_page;
pub mod request_form;
pub mod user_dash;
pub mod user_settings;
