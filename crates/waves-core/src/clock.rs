//! Playback clock: elapsed time, duration and progress of the active media.

use serde::{Deserialize, Serialize};

use crate::error::PlayerError;

/// Timing of the active media as last reported by the element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClockState {
    pub current_time: f64,
    /// `None` until the element reports a finite, positive duration.
    pub duration: Option<f64>,
    /// `current_time / duration`, 0 when the duration is unknown.
    pub progress: f64,
}

impl ClockState {
    /// Feed a native time update.
    pub fn on_time_update(&mut self, current_time: f64, duration: f64) {
        self.current_time = sanitize_time(current_time);
        self.duration = known_duration(duration);
        self.progress = match self.duration {
            Some(d) => (self.current_time / d).clamp(0.0, 1.0),
            None => 0.0,
        };
    }

    /// Resolve a seek fraction to a target time in seconds.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::InvalidSeek`] for NaN and
    /// [`PlayerError::UnknownDuration`] before the duration is known.
    pub fn seek_target(&self, fraction: f64) -> Result<f64, PlayerError> {
        if fraction.is_nan() {
            return Err(PlayerError::InvalidSeek(fraction));
        }
        let duration = self.duration.ok_or(PlayerError::UnknownDuration)?;
        Ok(fraction.clamp(0.0, 1.0) * duration)
    }

    /// Record a completed seek so progress does not lag the next time update.
    pub fn seeked(&mut self, time: f64) {
        let duration = self.duration.unwrap_or(f64::NAN);
        self.on_time_update(time, duration);
    }

    /// Progress on the 0..=100 scale used by seek controls.
    pub fn progress_percent(&self) -> f64 {
        self.progress * 100.0
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn sanitize_time(t: f64) -> f64 {
    if t.is_finite() && t > 0.0 {
        t
    } else {
        0.0
    }
}

fn known_duration(d: f64) -> Option<f64> {
    (d.is_finite() && d > 0.0).then_some(d)
}

/// Format seconds as `M:SS`. Minutes are unbounded.
pub fn format_time(seconds: f64) -> String {
    let total = sanitize_time(seconds).floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_padded_seconds() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(65.0), "1:05");
        assert_eq!(format_time(599.0), "9:59");
        assert_eq!(format_time(3600.4), "60:00");
        assert_eq!(format_time(-3.0), "0:00");
        assert_eq!(format_time(f64::NAN), "0:00");
    }

    #[test]
    fn progress_is_zero_without_duration() {
        let mut clock = ClockState::default();
        clock.on_time_update(12.0, f64::NAN);
        assert_eq!(clock.current_time, 12.0);
        assert_eq!(clock.duration, None);
        assert_eq!(clock.progress, 0.0);

        clock.on_time_update(12.0, f64::INFINITY);
        assert_eq!(clock.progress, 0.0);
    }

    #[test]
    fn progress_tracks_time() {
        let mut clock = ClockState::default();
        clock.on_time_update(50.0, 200.0);
        assert_eq!(clock.progress, 0.25);
        assert_eq!(clock.progress_percent(), 25.0);
    }

    #[test]
    fn seek_half_of_two_hundred_is_one_hundred() {
        let mut clock = ClockState::default();
        clock.on_time_update(0.0, 200.0);
        assert_eq!(clock.seek_target(0.5), Ok(100.0));
        assert_eq!(clock.seek_target(1.5), Ok(200.0));
    }

    #[test]
    fn seek_needs_known_duration() {
        let clock = ClockState::default();
        assert_eq!(clock.seek_target(0.5), Err(PlayerError::UnknownDuration));
        assert!(matches!(
            clock.seek_target(f64::NAN),
            Err(PlayerError::InvalidSeek(_))
        ));
    }
}
