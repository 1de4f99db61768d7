//! Game service: the request/response surface of the game core

mod clock;
mod error;
mod game;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::ApiError;
pub use game::GameService;
pub use types::parse_request;
