pub mod user;
pub mod video;
