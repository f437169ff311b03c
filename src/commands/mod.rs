pub mod config;
pub mod profile;
pub mod run;
pub mod version;
