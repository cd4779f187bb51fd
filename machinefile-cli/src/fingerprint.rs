//! Default machine fingerprint.
//!
//! Used when the caller does not pass `--fingerprint`. The fingerprint is the
//! hex-encoded SHA-256 of a stable platform machine identifier, falling back
//! to the hostname. Issuers must compute the same value when activating the
//! machine, so any change here invalidates existing machine files.

use sha2::{Digest, Sha256};

/// Returns the fingerprint of the current machine.
#[must_use]
pub fn default_fingerprint() -> String {
    fingerprint_from(&machine_identifier())
}

/// Hashes a machine identifier into a fingerprint.
#[must_use]
pub fn fingerprint_from(identifier: &str) -> String {
    hex::encode(Sha256::digest(identifier.as_bytes()))
}

/// Returns the platform machine identifier, or the hostname if none is available.
#[must_use]
pub fn machine_identifier() -> String {
    get_machine_id().unwrap_or_else(get_hostname)
}

fn get_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string())
}

fn get_machine_id() -> Option<String> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("ioreg")
            .args(["-rd1", "-c", "IOPlatformExpertDevice"])
            .output()
            .ok()
            .and_then(|o| String::from_utf8(o.stdout).ok())
            .and_then(|output| {
                output
                    .lines()
                    .find(|l| l.contains("IOPlatformUUID"))
                    .and_then(|l| l.split('"').nth(3))
                    .map(String::from)
            })
    }

    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/etc/machine-id")
            .or_else(|_| std::fs::read_to_string("/var/lib/dbus/machine-id"))
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    {
        None
    }
}
