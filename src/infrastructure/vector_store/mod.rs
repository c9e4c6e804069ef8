pub mod sled_vector_index;

pub use sled_vector_index::SledVectorIndex;
