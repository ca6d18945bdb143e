pub mod csv;

pub use self::csv::{HEADER, read_rows, write_rows};
