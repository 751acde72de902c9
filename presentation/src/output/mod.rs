pub mod console;

pub use console::ConsoleFormatter;
