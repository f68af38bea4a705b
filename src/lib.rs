pub mod models;
pub mod extension;
pub mod parser;
pub mod writer;
pub mod validate;
pub mod secure;
pub mod filter;
pub mod assembly;
pub mod constants;
pub mod normalize;
pub mod error;

pub use assembly::DisplayManager;
pub use error::{Result, VastError};
pub use models::Vast;
pub use normalize::{normalize, NormalizeOptions, Size};
pub use parser::parse_vast;
pub use secure::secure_url;
pub use writer::{to_xml, to_xml_pretty};
