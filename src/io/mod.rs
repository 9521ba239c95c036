pub mod library_io;
pub mod watcher;
