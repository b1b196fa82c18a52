use std::path::Path;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, info, warn};

use crate::error::AudioError;

use super::device::find_output_device;
use super::output::AudioOutput;
use super::sink::create_paused_sink;

/// `AudioOutput` backed by a `rodio` output stream and a single `Sink`.
pub struct RodioOutput {
    stream: OutputStream,
    sink: Option<Sink>,
    /// Seek requested while nothing was queued; applied on the next start.
    pending_seek: Option<Duration>,
    /// Name of the device in use; `None` is the system default.
    device: Option<String>,
}

impl RodioOutput {
    /// Open the output named `device_name` (empty = system default).
    ///
    /// An unknown or broken device falls back to the default with a warning;
    /// only a failure to open the default device is an error.
    pub fn open(device_name: &str) -> Result<Self, AudioError> {
        let (stream, device) = open_stream(device_name)?;
        Ok(Self {
            stream,
            sink: None,
            pending_seek: None,
            device,
        })
    }

    /// Reopen the stream on another device. Returns the device actually in
    /// use (`None` for the default). Whatever was loaded is unloaded; callers
    /// reload through the transport.
    pub fn switch_device(&mut self, device_name: &str) -> Result<Option<String>, AudioError> {
        self.stop();
        let (stream, device) = open_stream(device_name)?;
        self.stream = stream;
        self.device = device.clone();
        Ok(device)
    }

    pub fn device_name(&self) -> Option<&str> {
        self.device.as_deref()
    }
}

fn open_stream(device_name: &str) -> Result<(OutputStream, Option<String>), AudioError> {
    let wanted = device_name.trim();
    if !wanted.is_empty() {
        match open_named(wanted) {
            Ok(stream) => {
                info!(device = wanted, "opened output device");
                return Ok((quiet(stream), Some(wanted.to_string())));
            }
            Err(e) => warn!(error = %e, "falling back to the default output device"),
        }
    }

    let stream = OutputStreamBuilder::open_default_stream()?;
    info!("opened default output device");
    Ok((quiet(stream), None))
}

fn open_named(name: &str) -> Result<OutputStream, AudioError> {
    let device = find_output_device(name).ok_or_else(|| AudioError::DeviceUnavailable {
        name: name.to_string(),
    })?;
    let stream = OutputStreamBuilder::from_device(device)?.open_stream()?;
    Ok(stream)
}

// rodio logs to stderr when OutputStream is dropped, which would draw over the TUI.
fn quiet(mut stream: OutputStream) -> OutputStream {
    stream.log_on_drop(false);
    stream
}

impl AudioOutput for RodioOutput {
    fn load(&mut self, path: &Path) -> Result<(), AudioError> {
        self.stop();
        let sink = create_paused_sink(&self.stream, path)?;
        self.sink = Some(sink);
        self.pending_seek = None;
        debug!(path = %path.display(), "loaded track");
        Ok(())
    }

    fn play(&mut self, start: Duration) -> Result<(), AudioError> {
        let sink = self.sink.as_ref().ok_or(AudioError::NoTrackLoaded)?;
        let pending = self.pending_seek.take();
        let start = if start.is_zero() {
            pending.unwrap_or(start)
        } else {
            start
        };
        if !start.is_zero() {
            if let Err(e) = sink.try_seek(start) {
                warn!(error = %e, "could not seek before starting; playing from the top");
            }
        }
        sink.play();
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn resume(&mut self) {
        let Some(sink) = &self.sink else {
            return;
        };
        if let Some(at) = self.pending_seek.take() {
            if let Err(e) = sink.try_seek(at) {
                debug!(error = %e, "dropping deferred seek");
            }
        }
        sink.play();
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    fn set_position(&mut self, position: Duration) -> Result<(), AudioError> {
        match &self.sink {
            Some(sink) if !sink.empty() => {
                sink.try_seek(position)?;
            }
            _ => {
                debug!(?position, "nothing queued; deferring seek");
                self.pending_seek = Some(position);
            }
        }
        Ok(())
    }

    fn is_busy(&self) -> bool {
        self.sink
            .as_ref()
            .map(|s| !s.empty() && !s.is_paused())
            .unwrap_or(false)
    }
}
