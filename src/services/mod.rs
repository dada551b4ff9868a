pub mod errors;
pub mod seed;
pub mod todos;
pub mod users;
