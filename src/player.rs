use std::time::Duration;

use anyhow::Result;
use rand::Rng;

use crate::audio::AudioBackend;
use crate::playlist::Track;

/// Volume restored by unmuting. The pre-mute level is not remembered.
pub const UNMUTE_VOLUME: f32 = 0.5;

/// Icon state for the volume control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeIcon {
    Muted,
    Low,
    Full,
}

impl VolumeIcon {
    pub fn glyph(self) -> &'static str {
        match self {
            VolumeIcon::Muted => "✕",
            VolumeIcon::Low => "▂",
            VolumeIcon::Full => "█",
        }
    }
}

/// Playback session: which track is loaded, how transitions happen, and how
/// the progress readout stays in sync with the backend. All transport
/// controls funnel through here; the draw layer only reads.
pub struct Player<B: AudioBackend> {
    backend: B,
    tracks: Vec<Track>,
    current: usize,
    active: bool,
    shuffle: bool,
    repeat: bool,
    seeking: bool,
    seek_pct: f64,
    volume: f32,
    progress_pct: f64,
    elapsed: Duration,
    // The active track's own play marker and the global transport marker are
    // tracked separately: toggle_play_pause only flips the transport one.
    track_playing: bool,
    transport_playing: bool,
}

impl<B: AudioBackend> Player<B> {
    pub fn new(tracks: Vec<Track>, backend: B) -> Self {
        Player {
            backend,
            tracks,
            current: 0,
            active: false,
            shuffle: false,
            repeat: false,
            seeking: false,
            seek_pct: 0.0,
            volume: 1.0,
            progress_pct: 0.0,
            elapsed: Duration::ZERO,
            track_playing: false,
            transport_playing: false,
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Index of the loaded track, if any track has been started.
    pub fn active_index(&self) -> Option<usize> {
        self.active.then_some(self.current)
    }

    pub fn is_shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn is_repeat(&self) -> bool {
        self.repeat
    }

    pub fn is_seeking(&self) -> bool {
        self.seeking
    }

    pub fn seek_pct(&self) -> f64 {
        self.seek_pct
    }

    pub fn progress_pct(&self) -> f64 {
        self.progress_pct
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Volume as the 0-100 integer the volume control works in.
    pub fn volume_level(&self) -> u8 {
        (self.volume * 100.0).round() as u8
    }

    pub fn track_marker_playing(&self) -> bool {
        self.track_playing
    }

    pub fn transport_playing(&self) -> bool {
        self.transport_playing
    }

    pub fn total_duration(&self) -> Option<Duration> {
        if self.active { self.backend.duration() } else { None }
    }

    /// Elapsed time for the readout: while a seek drag is in flight it
    /// follows the drag position, not the playhead.
    pub fn display_elapsed(&self) -> Duration {
        if self.seeking {
            let total = self.backend.duration().unwrap_or_default();
            total.mul_f64(self.seek_pct / 100.0)
        } else {
            self.elapsed
        }
    }

    /// The active track played out naturally.
    pub fn finished(&self) -> bool {
        self.active && !self.backend.is_paused() && self.backend.is_finished()
    }

    /// A track's own play control was hit. Same track toggles pause/resume;
    /// a different track replaces the loaded one and starts from zero.
    pub fn select_track(&mut self, index: usize) -> Result<()> {
        if index >= self.tracks.len() {
            return Ok(());
        }
        if self.active && self.current == index {
            if self.backend.is_paused() {
                self.backend.play();
                self.track_playing = true;
                self.transport_playing = true;
            } else {
                self.backend.pause();
                self.track_playing = false;
                self.transport_playing = false;
            }
            return Ok(());
        }
        if self.active {
            self.reset_current();
        }
        self.start(index)
    }

    /// Global transport button. No-op until something has played. Leaves the
    /// per-track marker alone; only select_track flips that one.
    pub fn toggle_play_pause(&mut self) {
        if !self.active {
            return;
        }
        if self.backend.is_paused() {
            self.backend.play();
            self.transport_playing = true;
        } else {
            self.backend.pause();
            self.transport_playing = false;
        }
    }

    /// Advance to the next track. Shuffle picks uniformly over the whole
    /// list, the current index included.
    pub fn next_track(&mut self) -> Result<()> {
        self.reset_current();
        let n = self.tracks.len();
        let next = if self.shuffle {
            rand::thread_rng().gen_range(0..n)
        } else {
            (self.current + 1) % n
        };
        self.start(next)
    }

    /// Step back one track, wrapping at zero. Shuffle is ignored here.
    pub fn previous_track(&mut self) -> Result<()> {
        self.reset_current();
        let n = self.tracks.len();
        self.start((self.current + n - 1) % n)
    }

    /// Natural end of the active track: replay it under repeat, otherwise
    /// behave exactly like the next button.
    pub fn on_track_end(&mut self) -> Result<()> {
        if self.repeat {
            self.reset_current();
            self.start(self.current)
        } else {
            self.next_track()
        }
    }

    pub fn toggle_shuffle(&mut self) {
        self.shuffle = !self.shuffle;
    }

    pub fn toggle_repeat(&mut self) {
        self.repeat = !self.repeat;
    }

    /// Volume control moved; level is the control's 0-100 integer.
    pub fn set_volume(&mut self, level: u8) {
        self.volume = f32::from(level.min(100)) / 100.0;
        if self.active {
            self.backend.set_volume(self.volume);
        }
    }

    pub fn volume_icon(&self) -> VolumeIcon {
        if self.volume == 0.0 {
            VolumeIcon::Muted
        } else if self.volume < 0.5 {
            VolumeIcon::Low
        } else {
            VolumeIcon::Full
        }
    }

    /// Mute toggle, guarded on an active track. Unmuting restores the fixed
    /// UNMUTE_VOLUME, never the pre-mute level.
    pub fn toggle_mute(&mut self) {
        if !self.active {
            return;
        }
        self.volume = if self.volume > 0.0 { 0.0 } else { UNMUTE_VOLUME };
        self.backend.set_volume(self.volume);
    }

    /// Seek drag started; progress ticks are suppressed until end_seek.
    pub fn begin_seek(&mut self) {
        self.seeking = true;
        self.seek_pct = self.progress_pct;
    }

    /// Drag moved. Only the elapsed readout follows; the actual seek waits
    /// for end_seek so we don't thrash the decoder mid-drag.
    pub fn seek_drag(&mut self, pct: f64) {
        if self.seeking {
            self.seek_pct = pct.clamp(0.0, 100.0);
        }
    }

    /// Drag released at pct of the total duration; perform the real seek.
    pub fn end_seek(&mut self, pct: f64) {
        self.seeking = false;
        if self.active {
            if let Some(total) = self.backend.duration() {
                self.backend.seek(total.mul_f64(pct.clamp(0.0, 100.0) / 100.0));
            }
        }
    }

    /// Periodic progress update. Skipped while nothing is loaded or a drag
    /// is in flight, so the bar never fights the user's hand.
    pub fn on_tick(&mut self) {
        if !self.active || self.seeking {
            return;
        }
        self.elapsed = self.backend.position();
        // Unknown duration counts as one second to avoid dividing by zero.
        let total = self
            .backend
            .duration()
            .filter(|t| !t.is_zero())
            .unwrap_or(Duration::from_secs(1));
        self.progress_pct =
            (self.elapsed.as_secs_f64() / total.as_secs_f64() * 100.0).min(100.0);
    }

    fn start(&mut self, index: usize) -> Result<()> {
        self.backend.load(&self.tracks[index].path, self.volume)?;
        self.current = index;
        self.active = true;
        self.track_playing = true;
        self.transport_playing = true;
        self.elapsed = Duration::ZERO;
        self.progress_pct = 0.0;
        Ok(())
    }

    fn reset_current(&mut self) {
        if self.active {
            self.backend.stop();
        }
        self.track_playing = false;
        self.elapsed = Duration::ZERO;
        self.progress_pct = 0.0;
    }
}

pub fn format_time(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    #[derive(Default)]
    struct FakeBackend {
        loaded: Option<PathBuf>,
        paused: bool,
        pos: Duration,
        total: Option<Duration>,
        volume: f32,
        finished: bool,
        seeks: Vec<Duration>,
        ops: Vec<String>,
    }

    impl AudioBackend for FakeBackend {
        fn load(&mut self, path: &Path, volume: f32) -> Result<()> {
            self.ops.push(format!("load {}", path.display()));
            self.loaded = Some(path.to_path_buf());
            self.paused = false;
            self.pos = Duration::ZERO;
            self.volume = volume;
            self.finished = false;
            Ok(())
        }

        fn play(&mut self) {
            self.ops.push("play".into());
            self.paused = false;
        }

        fn pause(&mut self) {
            self.ops.push("pause".into());
            self.paused = true;
        }

        fn stop(&mut self) {
            self.ops.push("stop".into());
            self.loaded = None;
            self.paused = false;
            self.pos = Duration::ZERO;
        }

        fn seek(&mut self, pos: Duration) {
            self.seeks.push(pos);
            self.pos = pos;
        }

        fn set_volume(&mut self, volume: f32) {
            self.volume = volume;
        }

        fn position(&self) -> Duration {
            self.pos
        }

        fn duration(&self) -> Option<Duration> {
            self.total
        }

        fn is_paused(&self) -> bool {
            self.paused
        }

        fn is_finished(&self) -> bool {
            self.finished
        }
    }

    fn test_tracks(n: usize) -> Vec<Track> {
        (0..n)
            .map(|i| Track {
                path: PathBuf::from(format!("/music/track{i}.mp3")),
                title: format!("track{i}"),
            })
            .collect()
    }

    fn player(n: usize) -> Player<FakeBackend> {
        Player::new(test_tracks(n), FakeBackend::default())
    }

    #[test]
    fn select_starts_from_zero() {
        let mut p = player(3);
        p.select_track(1).unwrap();
        assert_eq!(p.active_index(), Some(1));
        assert_eq!(
            p.backend.loaded.as_deref(),
            Some(Path::new("/music/track1.mp3"))
        );
        assert!(!p.backend.paused);
    }

    #[test]
    fn select_same_track_toggles_both_markers() {
        let mut p = player(3);
        p.select_track(0).unwrap();
        assert!(p.track_marker_playing() && p.transport_playing());

        p.select_track(0).unwrap();
        assert!(p.backend.paused);
        assert!(!p.track_marker_playing() && !p.transport_playing());

        p.select_track(0).unwrap();
        assert!(!p.backend.paused);
        assert!(p.track_marker_playing() && p.transport_playing());
    }

    #[test]
    fn at_most_one_track_loaded_across_transitions() {
        let mut p = player(4);
        p.select_track(2).unwrap();
        p.next_track().unwrap();
        p.previous_track().unwrap();
        p.select_track(0).unwrap();
        p.on_track_end().unwrap();

        // Every load after the first must have been preceded by a stop.
        let mut loads = 0;
        let mut stops = 0;
        for op in &p.backend.ops {
            if op.starts_with("load") {
                assert_eq!(loads, stops, "load without resetting the previous track");
                loads += 1;
            } else if op == "stop" {
                stops += 1;
            }
        }
        assert!(p.backend.loaded.is_some());
    }

    #[test]
    fn next_is_sequential_and_wraps() {
        let mut p = player(3);
        p.select_track(0).unwrap();
        p.next_track().unwrap();
        assert_eq!(p.active_index(), Some(1));
        p.next_track().unwrap();
        assert_eq!(p.active_index(), Some(2));
        p.next_track().unwrap();
        assert_eq!(p.active_index(), Some(0));
    }

    #[test]
    fn next_round_trips_after_n_calls() {
        let mut p = player(5);
        p.select_track(3).unwrap();
        for _ in 0..5 {
            p.next_track().unwrap();
        }
        assert_eq!(p.active_index(), Some(3));
    }

    #[test]
    fn previous_wraps_backward() {
        let mut p = player(5);
        p.select_track(0).unwrap();
        p.previous_track().unwrap();
        assert_eq!(p.active_index(), Some(4));
    }

    #[test]
    fn shuffle_next_stays_in_range() {
        let mut p = player(4);
        p.toggle_shuffle();
        p.select_track(0).unwrap();
        for _ in 0..50 {
            p.next_track().unwrap();
            assert!(p.active_index().unwrap() < 4);
            assert!(p.backend.loaded.is_some());
        }
    }

    #[test]
    fn repeat_replays_same_index() {
        let mut p = player(3);
        p.toggle_repeat();
        p.select_track(1).unwrap();
        p.on_track_end().unwrap();
        assert_eq!(p.active_index(), Some(1));
        // Full reset and reload, not a seek back to zero.
        assert_eq!(
            p.backend.ops.iter().filter(|op| op.starts_with("load")).count(),
            2
        );
    }

    #[test]
    fn track_end_without_repeat_advances() {
        let mut p = player(3);
        p.select_track(2).unwrap();
        p.on_track_end().unwrap();
        assert_eq!(p.active_index(), Some(0));
    }

    #[test]
    fn completion_chain_walks_the_playlist() {
        let mut p = player(3);
        p.select_track(0).unwrap();
        p.on_track_end().unwrap();
        assert_eq!(p.active_index(), Some(1));
        p.on_track_end().unwrap();
        assert_eq!(p.active_index(), Some(2));
        p.on_track_end().unwrap();
        assert_eq!(p.active_index(), Some(0));
    }

    #[test]
    fn transport_toggle_is_noop_when_nothing_played() {
        let mut p = player(3);
        p.toggle_play_pause();
        assert!(p.backend.ops.is_empty());
        assert_eq!(p.active_index(), None);
    }

    #[test]
    fn transport_toggle_leaves_track_marker_alone() {
        let mut p = player(3);
        p.select_track(0).unwrap();
        p.toggle_play_pause();
        assert!(p.backend.paused);
        assert!(!p.transport_playing());
        assert!(p.track_marker_playing());
    }

    #[test]
    fn volume_icon_thresholds() {
        let mut p = player(1);
        p.set_volume(0);
        assert_eq!(p.volume_icon(), VolumeIcon::Muted);
        p.set_volume(40);
        assert_eq!(p.volume_icon(), VolumeIcon::Low);
        p.set_volume(50);
        assert_eq!(p.volume_icon(), VolumeIcon::Full);
        p.set_volume(75);
        assert_eq!(p.volume_icon(), VolumeIcon::Full);
    }

    #[test]
    fn volume_applies_to_backend_only_when_active() {
        let mut p = player(2);
        p.set_volume(30);
        assert_eq!(p.backend.volume, 0.0);
        p.select_track(0).unwrap();
        p.set_volume(80);
        assert!((p.backend.volume - 0.8).abs() < f32::EPSILON);
    }

    #[test]
    fn mute_is_lossy() {
        let mut p = player(2);
        p.select_track(0).unwrap();
        p.set_volume(70);
        p.toggle_mute();
        assert_eq!(p.volume(), 0.0);
        assert_eq!(p.volume_icon(), VolumeIcon::Muted);
        p.toggle_mute();
        assert!((p.volume() - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn mute_ignored_when_inactive() {
        let mut p = player(2);
        p.toggle_mute();
        assert!((p.volume() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn format_time_pads_seconds_only() {
        assert_eq!(format_time(Duration::from_secs(65)), "1:05");
        assert_eq!(format_time(Duration::from_secs(5)), "0:05");
        assert_eq!(format_time(Duration::from_secs(125)), "2:05");
        assert_eq!(format_time(Duration::ZERO), "0:00");
    }

    #[test]
    fn ticks_track_the_playhead() {
        let mut p = player(1);
        p.select_track(0).unwrap();
        p.backend.total = Some(Duration::from_secs(200));
        p.backend.pos = Duration::from_secs(50);
        p.on_tick();
        assert!((p.progress_pct() - 25.0).abs() < 1e-9);
        assert_eq!(p.display_elapsed(), Duration::from_secs(50));
    }

    #[test]
    fn tick_defaults_unknown_duration_to_one_second() {
        let mut p = player(1);
        p.select_track(0).unwrap();
        p.backend.pos = Duration::from_millis(500);
        p.on_tick();
        assert!((p.progress_pct() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn ticks_during_drag_do_not_move_the_bar() {
        let mut p = player(1);
        p.select_track(0).unwrap();
        p.backend.total = Some(Duration::from_secs(100));
        p.backend.pos = Duration::from_secs(10);
        p.on_tick();
        let before = p.progress_pct();

        p.begin_seek();
        p.seek_drag(80.0);
        p.backend.pos = Duration::from_secs(60);
        p.on_tick();
        p.on_tick();
        assert_eq!(p.progress_pct(), before);
        // The elapsed readout follows the drag instead.
        assert_eq!(p.display_elapsed(), Duration::from_secs(80));
    }

    #[test]
    fn end_seek_applies_the_real_seek() {
        let mut p = player(1);
        p.select_track(0).unwrap();
        p.backend.total = Some(Duration::from_secs(200));
        p.begin_seek();
        p.seek_drag(50.0);
        p.end_seek(50.0);
        assert!(!p.is_seeking());
        assert_eq!(p.backend.seeks, vec![Duration::from_secs(100)]);
    }

    #[test]
    fn end_seek_without_active_track_only_clears_the_flag() {
        let mut p = player(1);
        p.begin_seek();
        p.end_seek(40.0);
        assert!(!p.is_seeking());
        assert!(p.backend.seeks.is_empty());
    }
}
