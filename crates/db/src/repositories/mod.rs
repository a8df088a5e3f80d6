pub mod user_repo;
pub mod video_repo;

pub use user_repo::UserRepo;
pub use video_repo::VideoRepo;
