//! Output-device enumeration through the `cpal` host that `rodio` re-exports.

use rodio::cpal::{
    self,
    traits::{DeviceTrait, HostTrait},
};
use tracing::warn;

/// What the status line shows about the active device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub name: String,
    pub channels: u16,
    pub sample_rate: u32,
}

impl DeviceInfo {
    /// One-line summary, e.g. `USB DAC (USB) 2ch 48000Hz`.
    pub fn summary(&self) -> String {
        let kind = if self.name.to_ascii_uppercase().contains("USB") {
            "USB"
        } else {
            "built-in"
        };
        format!(
            "{} ({}) {}ch {}Hz",
            self.name, kind, self.channels, self.sample_rate
        )
    }
}

/// Names of every output device on the default host.
pub fn output_device_names() -> Vec<String> {
    let host = cpal::default_host();
    match host.output_devices() {
        Ok(devices) => devices.filter_map(|d| d.name().ok()).collect(),
        Err(e) => {
            warn!(error = %e, "failed to enumerate output devices");
            Vec::new()
        }
    }
}

pub(super) fn find_output_device(name: &str) -> Option<cpal::Device> {
    let host = cpal::default_host();
    host.output_devices()
        .ok()?
        .find(|d| d.name().map(|n| n == name).unwrap_or(false))
}

/// Describe the named device, or the default one for `None`.
pub fn describe_device(name: Option<&str>) -> Option<DeviceInfo> {
    let device = match name {
        Some(n) => find_output_device(n)?,
        None => cpal::default_host().default_output_device()?,
    };
    let name = device.name().ok()?;
    let config = device.default_output_config().ok()?;

    Some(DeviceInfo {
        name,
        channels: config.channels(),
        sample_rate: config.sample_rate().0,
    })
}
