//! Audio output: the `AudioOutput` seam the transport drives, its `rodio`
//! implementation and output-device enumeration.

mod device;
mod output;
mod player;
mod sink;

pub use device::{DeviceInfo, describe_device, output_device_names};
pub use output::AudioOutput;
pub use player::RodioOutput;
