use std::collections::VecDeque;
use std::io::Read;
use std::process::{Child, ChildStderr, ChildStdout, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamHandle, Sink};

use crate::core::MediaConfig;
use crate::media::audio::{decode_f32le, RingSource, SampleRing, CHANNELS, SAMPLE_RATE};
use crate::media::probe::{self, MediaInfo};
use crate::media::snapshot::PlaybackSnapshot;
use crate::media::source::MediaSource;

/// Decoded frames kept ahead of the clock.
const MAX_BUFFERED_FRAMES: usize = 120;

/// One decoded RGBA frame at the configured decode size.
#[derive(Debug)]
pub struct VideoFrame {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub timestamp: f64,
}

#[derive(Debug)]
pub enum MediaCommand {
    Load(MediaSource),
    Play,
    Pause,
    Seek(f64),
    /// Effective sink volume, already zero when muted.
    SetVolume(f32),
    Shutdown,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    MetadataReady(MediaInfo),
    PlaybackError(String),
    TimeAdvanced(f64),
    Playing,
    Paused,
}

/// Media position derived from a wall clock anchor while playing.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaybackClock {
    duration: Option<f64>,
    position: f64,
    anchor: Option<(Instant, f64)>,
}

impl PlaybackClock {
    pub fn new(duration: Option<f64>) -> Self {
        Self {
            duration,
            position: 0.0,
            anchor: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn start(&mut self, now: Instant) {
        self.anchor = Some((now, self.position));
    }

    pub fn stop(&mut self, now: Instant) {
        self.position = self.position_at(now);
        self.anchor = None;
    }

    pub fn position_at(&self, now: Instant) -> f64 {
        match self.anchor {
            Some((started, from)) => {
                let position = from + now.saturating_duration_since(started).as_secs_f64();
                match self.duration {
                    Some(duration) => position.min(duration),
                    None => position,
                }
            }
            None => self.position,
        }
    }

    /// Moves to `target`, clamped to the media. Live streams cannot seek.
    pub fn seek(&mut self, target: f64, now: Instant) -> Option<f64> {
        let duration = self.duration?;
        let clamped = if target.is_finite() { target.clamp(0.0, duration) } else { 0.0 };
        self.position = clamped;
        if self.anchor.is_some() {
            self.anchor = Some((now, clamped));
        }
        Some(clamped)
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        match self.duration {
            Some(duration) => self.position_at(now) >= duration,
            None => false,
        }
    }
}

/// Handle to the playback thread. Lives on the UI thread; all calls are non-blocking.
pub struct MediaSession {
    command_sender: mpsc::Sender<MediaCommand>,
    event_receiver: mpsc::Receiver<MediaEvent>,
    frame_receiver: mpsc::Receiver<VideoFrame>,
    thread_handle: Option<JoinHandle<()>>,
    snapshot: PlaybackSnapshot,
    seek_step: f64,
    volume_step: f32,
}

impl MediaSession {
    pub fn new(config: &MediaConfig) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let (frame_tx, frame_rx) = mpsc::channel();

        let thread_config = config.clone();
        let thread_handle = thread::Builder::new()
            .name("playback".to_string())
            .spawn(move || playback_thread(thread_config, cmd_rx, event_tx, frame_tx))
            .map_err(|e| log::error!("Failed to start playback thread: {}", e))
            .ok();

        Self {
            command_sender: cmd_tx,
            event_receiver: event_rx,
            frame_receiver: frame_rx,
            thread_handle,
            snapshot: PlaybackSnapshot::default(),
            seek_step: config.seek_step_seconds,
            volume_step: config.volume_step,
        }
    }

    fn send(&self, command: MediaCommand) {
        if self.command_sender.send(command).is_err() {
            log::warn!("Playback thread is gone, command dropped");
        }
    }

    /// Starts loading `source`; playback begins once metadata arrives.
    pub fn load(&mut self, source: MediaSource) {
        log::info!("Loading video {}", source.label());
        self.snapshot = PlaybackSnapshot {
            volume: self.snapshot.volume,
            muted: self.snapshot.muted,
            ..PlaybackSnapshot::default()
        };
        self.send(MediaCommand::Load(source));
    }

    pub fn play(&mut self) {
        if !self.snapshot.loaded {
            return;
        }
        self.snapshot.paused = false;
        self.send(MediaCommand::Play);
    }

    pub fn pause(&mut self) {
        if !self.snapshot.loaded {
            return;
        }
        self.snapshot.paused = true;
        self.send(MediaCommand::Pause);
    }

    /// Returns true if playback is now running.
    pub fn toggle_play(&mut self) -> bool {
        if self.snapshot.paused {
            self.play();
        } else {
            self.pause();
        }
        !self.snapshot.paused
    }

    pub fn seek(&mut self, target: f64) {
        let Some(duration) = self.snapshot.duration else {
            log::debug!("Ignoring seek on a stream without duration");
            return;
        };
        let clamped = target.clamp(0.0, duration);
        self.snapshot.position = clamped;
        self.send(MediaCommand::Seek(clamped));
    }

    pub fn seek_relative(&mut self, delta: f64) {
        self.seek(self.snapshot.position + delta);
    }

    pub fn rewind(&mut self) {
        self.seek_relative(-self.seek_step);
    }

    pub fn forward(&mut self) {
        self.seek_relative(self.seek_step);
    }

    /// Seeks to a fraction of the duration (progress bar click).
    pub fn seek_fraction(&mut self, fraction: f32) {
        if let Some(duration) = self.snapshot.duration {
            self.seek(duration * fraction.clamp(0.0, 1.0) as f64);
        }
    }

    /// Sets the volume in `[0, 1]` and returns the stored value.
    pub fn set_volume(&mut self, volume: f32) -> f32 {
        let volume = if volume.is_finite() { volume.clamp(0.0, 1.0) } else { 1.0 };
        self.snapshot.volume = (volume * 100.0).round() / 100.0;
        self.send(MediaCommand::SetVolume(self.snapshot.effective_volume()));
        self.snapshot.volume
    }

    pub fn volume_up(&mut self) -> f32 {
        self.set_volume(self.snapshot.volume + self.volume_step)
    }

    pub fn volume_down(&mut self) -> f32 {
        self.set_volume(self.snapshot.volume - self.volume_step)
    }

    /// Returns true if now muted.
    pub fn toggle_mute(&mut self) -> bool {
        self.snapshot.muted = !self.snapshot.muted;
        self.send(MediaCommand::SetVolume(self.snapshot.effective_volume()));
        self.snapshot.muted
    }

    /// Drains pending events and returns them with the newest frame, if any.
    pub fn poll(&mut self) -> (Vec<MediaEvent>, Option<VideoFrame>) {
        let mut events = Vec::new();
        while let Ok(event) = self.event_receiver.try_recv() {
            self.snapshot.apply(&event);
            events.push(event);
        }

        let mut latest_frame = None;
        while let Ok(frame) = self.frame_receiver.try_recv() {
            latest_frame = Some(frame);
        }
        (events, latest_frame)
    }

    pub fn snapshot(&self) -> &PlaybackSnapshot {
        &self.snapshot
    }
}

impl Drop for MediaSession {
    fn drop(&mut self) {
        let _ = self.command_sender.send(MediaCommand::Shutdown);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

/// Owns the ffmpeg child and its reader threads for the current source.
struct Player {
    config: MediaConfig,
    source: Option<MediaSource>,
    info: Option<MediaInfo>,
    clock: PlaybackClock,
    volume: f32,

    ffmpeg_process: Option<Child>,
    video_reader: Option<JoinHandle<()>>,
    audio_reader: Option<JoinHandle<()>>,
    reader_stop: Arc<AtomicBool>,
    frames: Arc<Mutex<VecDeque<VideoFrame>>>,

    stream_handle: Option<OutputStreamHandle>,
    sink: Option<Sink>,
    ring: Arc<Mutex<SampleRing>>,
    audio_stop: Arc<AtomicBool>,
}

impl Player {
    fn new(config: MediaConfig, stream_handle: Option<OutputStreamHandle>) -> Self {
        Self {
            config,
            source: None,
            info: None,
            clock: PlaybackClock::default(),
            volume: 1.0,
            ffmpeg_process: None,
            video_reader: None,
            audio_reader: None,
            reader_stop: Arc::new(AtomicBool::new(false)),
            frames: Arc::new(Mutex::new(VecDeque::new())),
            stream_handle,
            sink: None,
            ring: Arc::new(Mutex::new(SampleRing::with_seconds(2))),
            audio_stop: Arc::new(AtomicBool::new(false)),
        }
    }

    fn stop_decoding(&mut self) {
        self.reader_stop.store(true, Ordering::SeqCst);
        self.audio_stop.store(true, Ordering::SeqCst);
        if let Some(mut process) = self.ffmpeg_process.take() {
            log::debug!("Killing ffmpeg process");
            let _ = process.kill();
            let _ = process.wait();
        }
        if let Some(handle) = self.video_reader.take() {
            let _ = handle.join();
        }
        if let Some(handle) = self.audio_reader.take() {
            let _ = handle.join();
        }
        self.sink = None;
        if let Ok(mut frames) = self.frames.lock() {
            frames.clear();
        }
        if let Ok(mut ring) = self.ring.lock() {
            ring.clear();
        }
    }

    fn start_decoding(&mut self) -> Result<(), String> {
        let (Some(source), Some(info)) = (self.source.as_ref(), self.info.as_ref()) else {
            return Err("No video loaded".to_string());
        };

        let start = self.clock.position_at(Instant::now());
        let frame_rate = info.frame_rate.min(60.0);
        let has_audio = info.has_audio;
        let source = source.clone();
        let info = info.clone();

        // Without a sink nothing drains the audio pipe and ffmpeg would stall on it.
        let with_audio = has_audio && self.attach_sink();
        if has_audio && !with_audio {
            log::debug!("No audio sink, decoding video only");
        }
        let mut process = match spawn_ffmpeg(&self.config, &source, &info, start, with_audio) {
            Ok(process) => process,
            Err(e) => {
                self.stop_decoding();
                return Err(e);
            }
        };
        log::debug!("ffmpeg started at {:.2}s ({:.2} fps)", start, frame_rate);

        self.reader_stop.store(false, Ordering::SeqCst);
        if let Some(stdout) = process.stdout.take() {
            let stop = self.reader_stop.clone();
            let frames = self.frames.clone();
            let (width, height) = (self.config.decode_width, self.config.decode_height);
            self.video_reader = Some(thread::spawn(move || {
                video_reader_thread(stdout, frames, stop, width, height, frame_rate, start);
            }));
        }
        if with_audio {
            if let Some(stderr) = process.stderr.take() {
                let stop = self.reader_stop.clone();
                let ring = self.ring.clone();
                self.audio_reader = Some(thread::spawn(move || audio_reader_thread(stderr, ring, stop)));
            }
        }
        self.ffmpeg_process = Some(process);
        Ok(())
    }

    /// Returns true if a sink is now draining the sample ring.
    fn attach_sink(&mut self) -> bool {
        let Some(handle) = self.stream_handle.as_ref() else {
            return false;
        };
        self.audio_stop.store(false, Ordering::SeqCst);
        match Sink::try_new(handle) {
            Ok(sink) => {
                sink.set_volume(self.volume);
                sink.append(RingSource::new(self.ring.clone(), self.audio_stop.clone()));
                sink.play();
                self.sink = Some(sink);
                true
            }
            Err(e) => {
                log::warn!("Failed to create audio sink: {}", e);
                false
            }
        }
    }

    fn load(&mut self, source: MediaSource, events: &mpsc::Sender<MediaEvent>) {
        self.stop_decoding();
        self.source = None;
        self.info = None;
        self.clock = PlaybackClock::default();

        let info = match probe::probe(&self.config.ffprobe_binary(), &source) {
            Ok(info) => info,
            Err(e) => {
                log::error!("Failed to load {}: {}", source.label(), e);
                let _ = events.send(MediaEvent::PlaybackError(
                    "Error loading video. Please try a different URL.".to_string(),
                ));
                return;
            }
        };

        log::info!(
            "Loaded {}: {}x{}, {}",
            source.label(),
            info.width,
            info.height,
            match info.duration {
                Some(d) => format!("{:.2}s", d),
                None => "live".to_string(),
            }
        );
        self.clock = PlaybackClock::new(info.duration);
        self.source = Some(source);
        self.info = Some(info.clone());
        let _ = events.send(MediaEvent::MetadataReady(info));
        self.play(events);
    }

    fn play(&mut self, events: &mpsc::Sender<MediaEvent>) {
        if self.source.is_none() || self.clock.is_running() {
            return;
        }
        if self.clock.is_finished(Instant::now()) {
            self.clock.seek(0.0, Instant::now());
        }
        match self.start_decoding() {
            Ok(()) => {
                self.clock.start(Instant::now());
                let _ = events.send(MediaEvent::Playing);
            }
            Err(e) => {
                log::error!("Failed to start ffmpeg: {}", e);
                let _ = events.send(MediaEvent::PlaybackError(
                    "Error playing video. Please try a different URL.".to_string(),
                ));
            }
        }
    }

    fn pause(&mut self, events: &mpsc::Sender<MediaEvent>) {
        if !self.clock.is_running() {
            return;
        }
        self.clock.stop(Instant::now());
        self.stop_decoding();
        log::info!("Paused at {:.2}s", self.clock.position_at(Instant::now()));
        let _ = events.send(MediaEvent::Paused);
    }

    fn seek(&mut self, target: f64, events: &mpsc::Sender<MediaEvent>, frames: &mpsc::Sender<VideoFrame>) {
        let was_running = self.clock.is_running();
        let now = Instant::now();
        let Some(position) = self.clock.seek(target, now) else {
            return;
        };
        log::info!("Seeking to {:.2}s", position);
        self.stop_decoding();

        if was_running {
            self.clock.stop(now);
            self.play(events);
        } else if let (Some(source), Some(info)) = (&self.source, &self.info) {
            match extract_still(&self.config, source, info, position) {
                Ok(frame) => {
                    let _ = frames.send(frame);
                }
                Err(e) => log::debug!("No still frame at {:.2}s: {}", position, e),
            }
        }
        let _ = events.send(MediaEvent::TimeAdvanced(position));
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(sink) = &self.sink {
            sink.set_volume(volume);
        }
    }

    /// Releases due frames and handles the end of the media.
    fn tick(&mut self, events: &mpsc::Sender<MediaEvent>, frame_tx: &mpsc::Sender<VideoFrame>) {
        if !self.clock.is_running() {
            return;
        }
        let now = Instant::now();

        if self.clock.is_finished(now) {
            self.clock.stop(now);
            self.stop_decoding();
            if self.config.loop_playback {
                log::debug!("Reached the end, looping");
                self.clock.seek(0.0, now);
                self.play(events);
            } else {
                let _ = events.send(MediaEvent::Paused);
            }
            return;
        }

        let current = self.clock.position_at(now);
        if let Ok(mut frames) = self.frames.lock() {
            while frames.front().is_some_and(|f| f.timestamp <= current) {
                if let Some(frame) = frames.pop_front() {
                    let _ = frame_tx.send(frame);
                }
            }
        }
        let _ = events.send(MediaEvent::TimeAdvanced(current));
    }
}

fn playback_thread(
    config: MediaConfig,
    cmd_rx: mpsc::Receiver<MediaCommand>,
    event_tx: mpsc::Sender<MediaEvent>,
    frame_tx: mpsc::Sender<VideoFrame>,
) {
    let (_audio_stream, stream_handle) = match OutputStream::try_default() {
        Ok((stream, handle)) => (Some(stream), Some(handle)),
        Err(e) => {
            log::warn!("Failed to create audio output: {}. Video will play without audio.", e);
            (None, None)
        }
    };
    let mut player = Player::new(config, stream_handle);

    loop {
        let timeout = if player.clock.is_running() {
            Duration::from_millis(8)
        } else {
            Duration::from_millis(50)
        };

        match cmd_rx.recv_timeout(timeout) {
            Ok(MediaCommand::Load(source)) => player.load(source, &event_tx),
            Ok(MediaCommand::Play) => player.play(&event_tx),
            Ok(MediaCommand::Pause) => player.pause(&event_tx),
            Ok(MediaCommand::Seek(target)) => player.seek(target, &event_tx, &frame_tx),
            Ok(MediaCommand::SetVolume(volume)) => player.set_volume(volume),
            Ok(MediaCommand::Shutdown) => {
                log::info!("Playback thread shutting down");
                break;
            }
            Err(mpsc::RecvTimeoutError::Timeout) => player.tick(&event_tx, &frame_tx),
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                log::info!("Command channel disconnected, shutting down");
                break;
            }
        }
    }

    player.stop_decoding();
    log::info!("Playback thread exited");
}

/// Bytes in one RGBA frame.
fn frame_bytes(width: u32, height: u32) -> usize {
    width as usize * height as usize * 4
}

/// Builds the ffmpeg invocation: RGBA frames on stdout, f32le stereo on stderr when `with_audio`.
fn ffmpeg_args(
    config: &MediaConfig,
    source: &MediaSource,
    info: &MediaInfo,
    start: f64,
    with_audio: bool,
) -> Vec<std::ffi::OsString> {
    let mut args: Vec<std::ffi::OsString> = Vec::new();
    let mut push = |s: &str| args.push(s.into());

    push("-nostdin");
    push("-loglevel");
    push("quiet");
    if !info.is_live() && start > 0.0 {
        push("-ss");
        push(&format!("{:.3}", start));
    }
    push("-i");
    args.push(source.input_arg().to_os_string());

    let mut push = |s: &str| args.push(s.into());
    push("-map");
    push("0:v:0");
    push("-f");
    push("rawvideo");
    push("-pix_fmt");
    push("rgba");
    push("-s");
    push(&format!("{}x{}", config.decode_width, config.decode_height));
    push("-r");
    push(&format!("{:.3}", info.frame_rate.min(60.0)));
    push("pipe:1");

    if with_audio {
        push("-map");
        push("0:a:0");
        push("-f");
        push("f32le");
        push("-ac");
        push(&CHANNELS.to_string());
        push("-ar");
        push(&SAMPLE_RATE.to_string());
        push("pipe:2");
    }
    args
}

fn spawn_ffmpeg(
    config: &MediaConfig,
    source: &MediaSource,
    info: &MediaInfo,
    start: f64,
    with_audio: bool,
) -> Result<Child, String> {
    let stderr = if with_audio { Stdio::piped() } else { Stdio::null() };
    Command::new(config.ffmpeg_binary())
        .args(ffmpeg_args(config, source, info, start, with_audio))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(stderr)
        .spawn()
        .map_err(|e| format!("Failed to spawn ffmpeg: {}", e))
}

/// Single frame at `timestamp` for showing a paused seek.
fn extract_still(config: &MediaConfig, source: &MediaSource, info: &MediaInfo, timestamp: f64) -> Result<VideoFrame, String> {
    let (width, height) = (config.decode_width, config.decode_height);
    let output = Command::new(config.ffmpeg_binary())
        .arg("-nostdin")
        .arg("-loglevel").arg("quiet")
        .arg("-ss").arg(format!("{:.3}", timestamp))
        .arg("-i").arg(source.input_arg())
        .arg("-frames:v").arg("1")
        .arg("-f").arg("rawvideo")
        .arg("-pix_fmt").arg("rgba")
        .arg("-s").arg(format!("{}x{}", width, height))
        .arg("pipe:1")
        .output()
        .map_err(|e| format!("ffmpeg execution failed: {}", e))?;

    let expected = frame_bytes(width, height);
    if !output.status.success() || output.stdout.len() != expected {
        return Err(format!(
            "unexpected frame size {} (expected {}) for {}x{} source",
            output.stdout.len(),
            expected,
            info.width,
            info.height
        ));
    }
    Ok(VideoFrame {
        pixels: output.stdout,
        width,
        height,
        timestamp,
    })
}

fn video_reader_thread(
    mut stdout: ChildStdout,
    frames: Arc<Mutex<VecDeque<VideoFrame>>>,
    stop: Arc<AtomicBool>,
    width: u32,
    height: u32,
    frame_rate: f64,
    start_position: f64,
) {
    let frame_duration = 1.0 / frame_rate.max(1.0);
    let mut index = 0u64;

    while !stop.load(Ordering::Relaxed) {
        let mut pixels = vec![0u8; frame_bytes(width, height)];
        if let Err(e) = stdout.read_exact(&mut pixels) {
            if e.kind() != std::io::ErrorKind::UnexpectedEof {
                log::debug!("Video reader error: {}", e);
            }
            break;
        }

        let frame = VideoFrame {
            pixels,
            width,
            height,
            timestamp: start_position + index as f64 * frame_duration,
        };
        index += 1;

        // Hold back instead of dropping so the clock catches up.
        loop {
            if stop.load(Ordering::Relaxed) {
                return;
            }
            match frames.lock() {
                Ok(mut queue) if queue.len() < MAX_BUFFERED_FRAMES => {
                    queue.push_back(frame);
                    break;
                }
                Ok(_) => {}
                Err(_) => return,
            }
            thread::sleep(Duration::from_millis(4));
        }
    }
    log::debug!("Video reader stopped after {} frames", index);
}

fn audio_reader_thread(mut stderr: ChildStderr, ring: Arc<Mutex<SampleRing>>, stop: Arc<AtomicBool>) {
    let mut chunk = vec![0u8; 4096];
    let mut carry: Vec<u8> = Vec::new();

    while !stop.load(Ordering::Relaxed) {
        let read = match stderr.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                log::debug!("Audio reader error: {}", e);
                break;
            }
        };
        carry.extend_from_slice(&chunk[..read]);
        let whole = carry.len() - carry.len() % 4;
        let mut samples = decode_f32le(&carry[..whole]);
        carry.drain(..whole);

        // Wait for room so audio is not silently truncated.
        while !samples.is_empty() && !stop.load(Ordering::Relaxed) {
            let written = match ring.lock() {
                Ok(mut ring) => ring.write(&samples),
                Err(_) => return,
            };
            samples.drain(..written);
            if !samples.is_empty() {
                thread::sleep(Duration::from_millis(5));
            }
        }
    }
    log::debug!("Audio reader stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn info(duration: Option<f64>, has_audio: bool) -> MediaInfo {
        MediaInfo {
            width: 1280,
            height: 720,
            duration,
            frame_rate: 24.0,
            has_audio,
        }
    }

    #[test]
    fn test_clock_advances_only_while_running() {
        let t0 = Instant::now();
        let mut clock = PlaybackClock::new(Some(100.0));
        assert_eq!(clock.position_at(t0 + Duration::from_secs(5)), 0.0);

        clock.start(t0);
        assert!((clock.position_at(t0 + Duration::from_secs(3)) - 3.0).abs() < 1e-9);
        clock.stop(t0 + Duration::from_secs(3));
        assert!((clock.position_at(t0 + Duration::from_secs(60)) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_clock_clamps_to_duration() {
        let t0 = Instant::now();
        let mut clock = PlaybackClock::new(Some(10.0));
        clock.start(t0);
        assert_eq!(clock.position_at(t0 + Duration::from_secs(30)), 10.0);
        assert!(clock.is_finished(t0 + Duration::from_secs(30)));

        assert_eq!(clock.seek(-5.0, t0), Some(0.0));
        assert_eq!(clock.seek(15.0, t0), Some(10.0));
    }

    #[test]
    fn test_live_clock_cannot_seek_or_finish() {
        let t0 = Instant::now();
        let mut clock = PlaybackClock::new(None);
        clock.start(t0);
        assert_eq!(clock.seek(10.0, t0), None);
        assert!(!clock.is_finished(t0 + Duration::from_secs(86_400)));
    }

    #[test]
    fn test_ffmpeg_args_video_and_audio() {
        let config = MediaConfig::default();
        let source = MediaSource::LocalFile(PathBuf::from("/tmp/clip.mp4"));
        let args: Vec<String> = ffmpeg_args(&config, &source, &info(Some(60.0), true), 12.5, true)
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        let ss = args.iter().position(|a| a == "-ss").unwrap();
        assert_eq!(args[ss + 1], "12.500");
        assert!(args.contains(&"854x480".to_string()));
        assert!(args.contains(&"rgba".to_string()));
        assert!(args.contains(&"pipe:1".to_string()));
        assert!(args.contains(&"pipe:2".to_string()));
        assert!(ss < args.iter().position(|a| a == "-i").unwrap());
    }

    #[test]
    fn test_ffmpeg_args_live_without_audio() {
        let config = MediaConfig::default();
        let source = MediaSource::AdaptiveManifest("https://example.com/live.m3u8".to_string());
        let args: Vec<String> = ffmpeg_args(&config, &source, &info(None, false), 40.0, false)
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert!(!args.contains(&"-ss".to_string()));
        assert!(!args.contains(&"pipe:2".to_string()));
        assert!(args.contains(&"https://example.com/live.m3u8".to_string()));
    }

    #[test]
    fn test_audio_pipe_skipped_without_sink() {
        let config = MediaConfig::default();
        let source = MediaSource::LocalFile(PathBuf::from("/tmp/clip.mp4"));
        let args: Vec<String> = ffmpeg_args(&config, &source, &info(Some(60.0), true), 0.0, false)
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert!(!args.contains(&"0:a:0".to_string()));
        assert!(!args.contains(&"f32le".to_string()));
        assert!(!args.contains(&"pipe:2".to_string()));
        assert!(args.contains(&"pipe:1".to_string()));
    }

    #[test]
    fn test_player_without_output_has_no_sink() {
        let mut player = Player::new(MediaConfig::default(), None);
        assert!(!player.attach_sink());
        assert!(player.sink.is_none());
    }

    #[test]
    fn test_decoding_without_sink_spawns_no_audio_reader() {
        let config = MediaConfig {
            ffmpeg_path: Some(PathBuf::from("true")),
            ..MediaConfig::default()
        };
        let mut player = Player::new(config, None);
        player.source = Some(MediaSource::LocalFile(PathBuf::from("/tmp/clip.mp4")));
        player.info = Some(info(Some(60.0), true));

        assert!(player.start_decoding().is_ok());
        assert!(player.audio_reader.is_none());
        assert!(player.sink.is_none());
        assert!(player.video_reader.is_some());
        player.stop_decoding();
    }

    #[test]
    fn test_frame_bytes_does_not_overflow() {
        assert_eq!(frame_bytes(854, 480), 854 * 480 * 4);
        assert_eq!(frame_bytes(40_000, 40_000), 6_400_000_000usize);
    }

    #[test]
    fn test_session_controls_before_load() {
        let mut session = MediaSession::new(&MediaConfig::default());
        assert!(!session.toggle_play());
        session.seek(30.0);
        assert_eq!(session.snapshot().position, 0.0);

        assert!((session.volume_down() - 0.9).abs() < 1e-6);
        assert_eq!(session.set_volume(3.0), 1.0);
        assert!(session.toggle_mute());
        assert_eq!(session.snapshot().effective_volume(), 0.0);
    }

    #[test]
    fn test_failed_probe_reports_error() {
        let config = MediaConfig {
            ffprobe_path: Some(PathBuf::from("/nonexistent/ffprobe")),
            ..MediaConfig::default()
        };
        let mut session = MediaSession::new(&config);
        session.load(MediaSource::LocalFile(PathBuf::from("/tmp/missing.mp4")));

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut errors = Vec::new();
        while errors.is_empty() && Instant::now() < deadline {
            let (events, _) = session.poll();
            errors.extend(events.into_iter().filter(|e| matches!(e, MediaEvent::PlaybackError(_))));
            thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(errors.len(), 1);
        assert!(!session.snapshot().loaded);
    }
}
