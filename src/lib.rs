// Crate root: declare modules and control visibility
pub mod bucket;
pub mod children;
pub mod error;
pub mod mock;
pub mod protocol;
pub mod registry;
pub mod summary;
pub mod text;
pub mod value;

// Re-export commonly used API from the library for hosts/tests
pub use bucket::BucketChildren;
pub use children::ArrayChildren;
pub use error::InspectError;
pub use registry::{default_registry, detect_shape, ContainerShape, Provider, Registry};
pub use text::{string_summary, TextStyle};
pub use value::ValueHandle;
