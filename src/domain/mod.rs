pub mod pair;
pub mod row;

pub use pair::Pair;
pub use row::ResultRow;
