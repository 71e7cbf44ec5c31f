pub mod entities;
pub mod shared_secret_admin_gate;
pub mod sheets;
pub mod sheets_registration_repository;
pub mod sqlite_registration_repository;
pub mod storage_backend;
