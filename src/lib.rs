pub mod engine;
pub mod flatten;
pub mod io;
pub mod model;
pub mod tui;
pub mod viewport;
