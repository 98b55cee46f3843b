//! CPAL audio output wrapper.

use crossbeam_channel::{bounded, Receiver, Sender};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::{AudioGenerator, Error, Result};

/// Stream errors kept until the game thread drains them.
const ERROR_QUEUE_CAPACITY: usize = 32;

/// Wrapper to hold a `cpal::Stream` in a `Send` context.
///
/// `cpal::Stream` is `!Send` due to platform internals. The stream is created,
/// held and dropped by the owning `AudioOutput` and is never touched otherwise.
struct StreamHandle(#[allow(dead_code)] cpal::Stream);

// SAFETY: the wrapped stream is only kept alive, never used, after construction.
unsafe impl Send for StreamHandle {}

/// Output device that pulls audio from a generator on the device's callback thread.
pub struct AudioOutput {
    sample_rate: f64,
    channels: usize,
    is_running: bool,
    device_index: Option<usize>,
    errors_tx: Sender<String>,
    errors_rx: Receiver<String>,
    _stream: Option<StreamHandle>,
}

impl AudioOutput {
    /// Open the output device (`None` = system default) without starting it.
    pub fn open(device_index: Option<usize>) -> Result<Self> {
        let device = get_device(device_index)?;
        let config = device.default_output_config()?;
        let (errors_tx, errors_rx) = bounded(ERROR_QUEUE_CAPACITY);

        Ok(Self {
            sample_rate: config.sample_rate().0 as f64,
            channels: config.channels() as usize,
            is_running: false,
            device_index,
            errors_tx,
            errors_rx,
            _stream: None,
        })
    }

    /// Move `generator` onto the audio thread and start the stream.
    pub fn start<G>(&mut self, generator: G) -> Result<()>
    where
        G: AudioGenerator + Send + 'static,
    {
        if self.is_running {
            return Ok(());
        }

        let device = get_device(self.device_index)?;
        let config = device.default_output_config()?;
        let errors = self.errors_tx.clone();

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => {
                build_stream::<f32, G>(&device, &config.into(), generator, errors)?
            }
            cpal::SampleFormat::I16 => {
                build_stream::<i16, G>(&device, &config.into(), generator, errors)?
            }
            cpal::SampleFormat::U16 => {
                build_stream::<u16, G>(&device, &config.into(), generator, errors)?
            }
            format => {
                return Err(Error::InvalidConfig(format!(
                    "Unsupported sample format: {format:?}"
                )));
            }
        };

        stream.play()?;
        self._stream = Some(StreamHandle(stream));
        self.is_running = true;

        Ok(())
    }

    /// Stop and drop the stream along with its generator.
    pub fn stop(&mut self) {
        self._stream = None;
        self.is_running = false;
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    /// Stream errors reported by the device since the last call.
    pub fn drain_errors(&self) -> Vec<String> {
        self.errors_rx.try_iter().collect()
    }

    pub fn device_name(&self) -> Result<String> {
        Ok(get_device(self.device_index)?.name()?)
    }

    pub fn list_devices() -> Result<Vec<String>> {
        cpal::default_host()
            .output_devices()?
            .enumerate()
            .map(|(i, d)| Ok(format!("{i}: {}", d.name()?)))
            .collect()
    }
}

fn get_device(index: Option<usize>) -> Result<cpal::Device> {
    let host = cpal::default_host();

    match index {
        Some(i) => {
            let devices: Vec<_> = host.output_devices()?.collect();
            let count = devices.len();
            devices.into_iter().nth(i).ok_or_else(|| {
                Error::InvalidDevice(format!("Device index {i} out of range ({count} available)"))
            })
        }
        None => host
            .default_output_device()
            .ok_or_else(|| Error::InvalidDevice("No output device available".into())),
    }
}

fn build_stream<T, G>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut generator: G,
    errors: Sender<String>,
) -> Result<cpal::Stream>
where
    T: cpal::SizedSample + cpal::FromSample<f32>,
    G: AudioGenerator + Send + 'static,
{
    let channels = config.channels as usize;

    // Grow on first callback, then stable
    let mut left = Vec::<f32>::new();
    let mut right = Vec::<f32>::new();

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                let frames = data.len() / channels;
                if left.len() < frames {
                    left.resize(frames, 0.0);
                    right.resize(frames, 0.0);
                }

                generator.render(&mut left[..frames], &mut right[..frames]);
                write_output(data, channels, &left[..frames], &right[..frames]);
            }));

            if result.is_err() {
                output_silence(data);
            }
        },
        move |err| {
            let _ = errors.try_send(err.to_string());
        },
        None,
    )?;

    Ok(stream)
}

/// Interleave planar stereo into the device buffer. Extra channels get silence.
#[inline]
fn write_output<T: cpal::SizedSample + cpal::FromSample<f32>>(
    data: &mut [T],
    channels: usize,
    left: &[f32],
    right: &[f32],
) {
    for (i, sample) in data.iter_mut().enumerate() {
        let frame = i / channels;
        let value = match i % channels {
            0 => left[frame],
            1 => right[frame],
            _ => 0.0,
        };
        *sample = T::from_sample(value);
    }
}

/// Output silence (panic recovery).
#[inline]
fn output_silence<T: cpal::SizedSample + cpal::FromSample<f32>>(data: &mut [T]) {
    for sample in data.iter_mut() {
        *sample = T::from_sample(0.0);
    }
}
