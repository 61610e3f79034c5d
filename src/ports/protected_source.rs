//! Protected path source port definition.

use crate::domain::AppError;

/// Port for fetching the list of protected LFNs.
///
/// `Ok` with an empty list means the source really is empty; an `Err` means it
/// could not be read. Both leave the cleaner without protection and stop the run.
pub trait ProtectedPathSource {
    /// Human-readable origin for logs.
    fn describe(&self) -> String;

    fn fetch(&self) -> Result<Vec<String>, AppError>;
}

impl<T: ProtectedPathSource + ?Sized> ProtectedPathSource for Box<T> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn fetch(&self) -> Result<Vec<String>, AppError> {
        (**self).fetch()
    }
}
