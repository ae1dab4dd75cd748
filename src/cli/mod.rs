pub mod check;
pub mod config;
pub mod init;
pub mod inspect;
pub mod run;
