pub mod environment;
pub mod paths;

pub use environment::default_alias_file;
pub use paths::display_path;
