pub mod address;
pub mod changes;
pub mod record;

pub use address::AddressGrammar;
pub use record::{FeatureFragment, FeatureRecord};
