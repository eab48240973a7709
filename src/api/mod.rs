mod error;
mod handlers;
mod types;

pub use error::ApiError;
pub use handlers::create_router;
pub use types::{spawn_feed_sweeper, AppState};
