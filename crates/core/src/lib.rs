//! Reading session logic. Keep this crate free of IO and platform concerns.

pub mod cards;
pub mod config;
pub mod deck;
pub mod events;
pub mod history;
pub mod locale;
pub mod reading;
pub mod rng;
pub mod session;
pub mod spread;
pub mod state;
pub mod timeline;

pub use cards::*;
pub use config::*;
pub use deck::*;
pub use events::*;
pub use history::*;
pub use locale::*;
pub use reading::*;
pub use rng::*;
pub use session::*;
pub use spread::*;
pub use state::*;
pub use timeline::*;
