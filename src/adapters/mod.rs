pub mod deletion_list_file;
pub mod hadoop_storage;
pub mod posix_storage;
pub mod protected_list_format;
pub mod protected_source_file;
pub mod protected_source_http;
pub mod protected_source_retrying;

use crate::domain::{AppError, CleanerConfig, StorageType};
use crate::ports::{ProtectedPathSource, StorageBackend};

use hadoop_storage::HadoopStorage;
use posix_storage::PosixStorage;
use protected_source_file::FileProtectedSource;
use protected_source_http::HttpProtectedSource;
use protected_source_retrying::{RetryPolicy, RetryingProtectedSource};

/// Select the storage backend named by the configuration.
pub fn open_storage(config: &CleanerConfig) -> Result<Box<dyn StorageBackend>, AppError> {
    match config.storage_type {
        StorageType::Posix => Ok(Box::new(PosixStorage::new())),
        StorageType::Hadoop => Ok(Box::new(HadoopStorage::new(config.hadoop_command.clone()))),
        StorageType::Dcache => Err(AppError::UnsupportedBackend(StorageType::Dcache.to_string())),
    }
}

/// Build the protected path source named by the configuration.
pub fn open_protected_source(
    config: &CleanerConfig,
) -> Result<Box<dyn ProtectedPathSource>, AppError> {
    if let Some(path) = &config.protected.path {
        return Ok(Box::new(FileProtectedSource::new(path.clone())));
    }

    let http = HttpProtectedSource::new(&config.protected)?;
    Ok(Box::new(RetryingProtectedSource::new(
        Box::new(http),
        RetryPolicy::from_config(&config.protected),
    )))
}
