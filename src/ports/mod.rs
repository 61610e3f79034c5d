mod protected_source;
mod storage_backend;

pub use protected_source::ProtectedPathSource;
pub use storage_backend::StorageBackend;
