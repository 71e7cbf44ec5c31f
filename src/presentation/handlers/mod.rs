pub mod admin_handler;
pub mod registration_handler;
