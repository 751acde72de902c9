mod loader;

pub use loader::LocalContextLoader;
