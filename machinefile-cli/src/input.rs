//! Certificate input.

use machinefile_license::{LicenseResult, MachineFileError};
use std::fs;
use std::path::Path;

/// Reads a machine file from disk.
///
/// # Errors
///
/// Returns [`MachineFileError::InputUnavailable`] if the file cannot be read
/// and [`MachineFileError::MalformedCertificate`] if it is not UTF-8 text.
pub fn read_certificate(path: &Path) -> LicenseResult<String> {
    let bytes = fs::read(path)?;
    String::from_utf8(bytes).map_err(|_| {
        MachineFileError::MalformedCertificate("certificate is not UTF-8 text".to_string())
    })
}
