use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use symphonia::core::{
    formats::FormatOptions,
    io::MediaSourceStream,
    meta::MetadataOptions,
    probe::Hint,
};

/// Seam to the host playback capability. One slot: loading a track replaces
/// whatever was there, stop rewinds it to zero and detaches it.
pub trait AudioBackend {
    fn load(&mut self, path: &Path, volume: f32) -> Result<()>;
    fn play(&mut self);
    fn pause(&mut self);
    fn stop(&mut self);
    fn seek(&mut self, pos: Duration);
    fn set_volume(&mut self, volume: f32);
    fn position(&self) -> Duration;
    fn duration(&self) -> Option<Duration>;
    fn is_paused(&self) -> bool;
    fn is_finished(&self) -> bool;
}

pub struct RodioBackend {
    stream: OutputStream,
    sink: Option<Sink>,
    path: Option<PathBuf>,
    total: Option<Duration>,
    // Sink position restarts at zero after every seek rebuild; the real
    // playhead is seek_base + sink.get_pos().
    seek_base: Duration,
    volume: f32,
    paused: bool,
}

impl RodioBackend {
    pub fn new() -> Result<Self> {
        let stream = OutputStreamBuilder::from_default_device()
            .context("no audio device")?
            .open_stream_or_fallback()
            .context("failed to open audio stream")?;
        Ok(RodioBackend {
            stream,
            sink: None,
            path: None,
            total: None,
            seek_base: Duration::ZERO,
            volume: 1.0,
            paused: false,
        })
    }

    fn decode(path: &Path) -> Result<Decoder<io::BufReader<fs::File>>> {
        let file = fs::File::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        Decoder::new(io::BufReader::new(file))
            .with_context(|| format!("failed to decode {}", path.display()))
    }
}

impl AudioBackend for RodioBackend {
    fn load(&mut self, path: &Path, volume: f32) -> Result<()> {
        if let Some(old) = self.sink.take() {
            old.stop();
        }

        // Total duration comes from a metadata probe; rodio itself may not
        // know it. None until the probe succeeds, shown as 0:00 meanwhile.
        self.total = probe_duration(path);

        let source = Self::decode(path)?;
        let sink = Sink::connect_new(self.stream.mixer());
        sink.set_volume(volume);
        sink.append(source);

        self.sink = Some(sink);
        self.path = Some(path.to_path_buf());
        self.seek_base = Duration::ZERO;
        self.volume = volume;
        self.paused = false;
        Ok(())
    }

    fn play(&mut self) {
        if let Some(sink) = &self.sink {
            sink.play();
            self.paused = false;
        }
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
            self.paused = true;
        }
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.path = None;
        self.total = None;
        self.seek_base = Duration::ZERO;
        self.paused = false;
    }

    /// Sinks can't rewind, so a seek drops the sink and rebuilds it from a
    /// freshly decoded source positioned at the target.
    fn seek(&mut self, pos: Duration) {
        let Some(path) = self.path.clone() else {
            return;
        };
        let clamped = self.total.map(|t| pos.min(t)).unwrap_or(pos);

        if let Some(old) = self.sink.take() {
            old.stop();
        }
        let sink = Sink::connect_new(self.stream.mixer());
        sink.set_volume(self.volume);

        match Self::decode(&path) {
            Ok(mut source) => {
                let _ = source.try_seek(clamped);
                sink.append(source);
            }
            Err(_) => return,
        }

        if self.paused {
            sink.pause();
        }
        self.sink = Some(sink);
        self.seek_base = clamped;
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(sink) = &self.sink {
            sink.set_volume(volume);
        }
    }

    fn position(&self) -> Duration {
        match &self.sink {
            Some(sink) => self.seek_base + sink.get_pos(),
            None => Duration::ZERO,
        }
    }

    fn duration(&self) -> Option<Duration> {
        self.total
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn is_finished(&self) -> bool {
        self.sink.as_ref().is_some_and(|s| s.empty())
    }
}

fn probe_duration(path: &Path) -> Option<Duration> {
    let file = fs::File::open(path).ok()?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .ok()?;

    let track = probed.format.default_track()?;
    let time_base = track.codec_params.time_base?;
    let n_frames = track.codec_params.n_frames?;
    let time = time_base.calc_time(n_frames);

    Some(Duration::from_secs_f64(time.seconds as f64 + time.frac))
}
