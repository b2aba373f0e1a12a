//! File storage for uploaded images.

mod local;
mod memory;

pub use local::LocalFileStorage;
pub use memory::InMemoryFileStorage;

use scribe_core::domain::media::is_safe_file_name;
use scribe_core::ports::StorageError;

fn check_names(folder: &str, name: &str) -> Result<(), StorageError> {
    for part in [folder, name] {
        if !is_safe_file_name(part) {
            return Err(StorageError::InvalidName(part.to_string()));
        }
    }
    Ok(())
}
