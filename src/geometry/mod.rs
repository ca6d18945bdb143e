pub mod error;
pub mod region;
pub mod sampler;

pub use error::GeometryError;
pub use region::Region;
pub use sampler::{generate_pairs, sample_point};
