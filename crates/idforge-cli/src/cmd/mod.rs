pub mod activity;
pub mod config;
pub mod ibo;
pub mod init;
pub mod persona;
pub mod session;
