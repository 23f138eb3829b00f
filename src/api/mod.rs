pub mod attendance;
pub mod dashboard;
pub mod employee;
pub mod leave;
pub mod report;
pub mod work_report;

use crate::accounting::filter::Directory;
use crate::error::AppError;
use crate::store::Store;

/// Whole directory, including inactive employees, for naming historic rows.
pub(crate) async fn load_directory(store: &dyn Store) -> Result<Directory, AppError> {
    Ok(Directory::new(store.employees(None).await?))
}

/// Treats a missing or blank field as absent.
pub(crate) fn required<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str, AppError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::validation(message)),
    }
}
