pub mod folder;
pub mod library;
pub mod snippet;

pub use folder::*;
pub use library::*;
pub use snippet::*;
