pub mod engine;
pub mod events;
pub mod history;
pub mod notification;
pub mod store;
pub mod token;
pub mod validation;

pub use engine::*;
pub use events::*;
pub use history::*;
pub use notification::*;
pub use store::*;
pub use token::*;
