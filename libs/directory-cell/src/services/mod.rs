pub mod directory;
pub mod seed;
pub mod status;

pub use directory::HospitalDirectory;
pub use seed::{default_feed, load_feed_from_path};
pub use status::StatusController;
