//! Read model views.

mod user_directory;

pub use user_directory::UserDirectoryView;
