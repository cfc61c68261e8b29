//! Pronunciation through the system text-to-speech command

use std::process::{Command, Stdio};

use log::{debug, warn};

pub const DEFAULT_VOICE: &str = "Samantha";

/// Something that can read words aloud. Speaking never fails the caller.
pub trait Speaker {
    fn speak(&self, text: &str);
}

/// Speaks through macOS `say`, without waiting for it to finish
#[derive(Debug, Clone)]
pub struct SaySpeaker {
    voice: String,
    mute: bool,
}

impl SaySpeaker {
    pub fn new(voice: impl Into<String>, mute: bool) -> Self {
        Self {
            voice: voice.into(),
            mute,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.mute && cfg!(target_os = "macos")
    }
}

impl Speaker for SaySpeaker {
    fn speak(&self, text: &str) {
        if !self.is_active() || text.trim().is_empty() {
            return;
        }

        let spawned = Command::new("say")
            .arg(text)
            .arg("-v")
            .arg(&self.voice)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        match spawned {
            Ok(child) => debug!("Pronouncing '{}' (pid {})", text, child.id()),
            Err(e) => warn!("Failed to pronounce '{}': {}", text, e),
        }
    }
}

/// Speaker that stays quiet
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Speaker for Silent {
    fn speak(&self, _text: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_muted_speaker_is_inactive() {
        let speaker = SaySpeaker::new(DEFAULT_VOICE, true);
        assert!(!speaker.is_active());
        // Must not spawn anything or panic
        speaker.speak("laconic");
    }

    #[test]
    fn test_active_only_on_macos() {
        let speaker = SaySpeaker::new("Alex", false);
        assert_eq!(speaker.is_active(), cfg!(target_os = "macos"));
    }
}
