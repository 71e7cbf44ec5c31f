pub mod admin_login_usecase;
pub mod registration_usecase;
