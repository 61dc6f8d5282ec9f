//! Device identity for redemption binding.
//!
//! The backend binds each code to the first device that redeems it. When
//! the host does not hand us an identifier, we derive a stable one from
//! machine identifiers: same device, same id, across restarts. The
//! components are hashed, so nothing about the machine is recoverable from
//! what goes on the wire.

use gatepass_types::DeviceId;
use sha2::{Digest, Sha256};
use std::env;

/// Length in hex characters of a generated device id.
const DEVICE_ID_LEN: usize = 32;

/// Derives a stable device id for the current machine.
#[must_use]
pub fn fingerprint_device() -> DeviceId {
    let mut hasher = Sha256::new();
    for part in identity_components() {
        hasher.update(part.as_bytes());
        hasher.update(b"|");
    }
    let digest = hex::encode(hasher.finalize());
    DeviceId::new(&digest[..DEVICE_ID_LEN])
}

/// A random, throwaway device id.
///
/// For hosts that opt out of fingerprinting; the backend will see every
/// session as a fresh device, so rebinding restrictions apply each time.
#[must_use]
pub fn ephemeral_device_id() -> DeviceId {
    DeviceId::new(uuid::Uuid::new_v4().simple().to_string())
}

fn identity_components() -> Vec<String> {
    let mut parts = vec![
        env::consts::OS.to_string(),
        env::consts::ARCH.to_string(),
        hostname(),
    ];
    if let Some(machine_id) = machine_id() {
        parts.push(machine_id);
    }
    if let Ok(user) = env::var("USER").or_else(|_| env::var("USERNAME")) {
        parts.push(user);
    }
    parts
}

fn hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Platform machine id, where one exists.
fn machine_id() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/etc/machine-id")
            .or_else(|_| std::fs::read_to_string("/var/lib/dbus/machine-id"))
            .ok()
            .map(|s| s.trim().to_string())
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("ioreg")
            .args(["-rd1", "-c", "IOPlatformExpertDevice"])
            .output()
            .ok()
            .and_then(|o| String::from_utf8(o.stdout).ok())
            .and_then(|out| {
                out.lines()
                    .find(|l| l.contains("IOPlatformUUID"))
                    .and_then(|l| l.split('"').nth(3))
                    .map(String::from)
            })
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    {
        None
    }
}
