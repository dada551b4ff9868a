pub mod config;
pub mod db;
pub mod password;
pub mod state;
pub mod storage;
