//! Intent classification for user input collected by `listen` statements.

pub mod mock;
pub mod remote;
pub mod types;

pub use mock::MockClassifier;
pub use remote::RemoteClassifier;
pub use types::{ClassifierError, IntentClassifier, IntentResult};
