//! HTTP handlers for all web routes.

pub mod home;
pub mod upload;
pub mod student;
pub mod profile;
pub mod assets;
pub mod system;
