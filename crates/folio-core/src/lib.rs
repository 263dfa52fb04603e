pub mod actions;
pub mod config;
pub mod controller;
pub mod gate;
pub mod navigation;
pub mod persistence;
pub mod reducer;
pub mod route;
pub mod selection;
pub mod state;

pub use actions::*;
pub use config::*;
pub use controller::*;
pub use gate::*;
pub use navigation::*;
pub use persistence::*;
pub use reducer::*;
pub use route::*;
pub use selection::*;
pub use state::*;
