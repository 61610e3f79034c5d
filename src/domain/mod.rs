pub mod candidate;
pub mod configuration;
pub mod deletion_list;
pub mod error;
pub mod namespace;
pub mod protected_index;
pub mod sanity_gate;

pub use candidate::{Candidate, EntryKind, EntryStat};
pub use configuration::{CleanerConfig, ListGranularity, ProtectedSourceConfig, StorageType};
pub use deletion_list::{DeletionList, ListHeader};
pub use error::{AppError, StorageError, SuspiciousConditions};
pub use protected_index::{ProtectedIndex, bi_search};
pub use sanity_gate::SanityGate;
