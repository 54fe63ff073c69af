//! Fire-and-forget audio trigger interface
//!
//! The sim emits [`GameEvent`]s; the harness maps them to samples here so
//! the simulation stays free of audio dependencies.

use crate::sim::GameEvent;

/// Procedurally generated samples the harness knows how to play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sample {
    Jump,
    DoubleJump,
    Stomp,
    Tongue,
    Eat,
    Coin,
    Hurt,
    Die,
}

/// Host-side audio sink
pub trait AudioPort {
    fn play_sample(&mut self, sample: Sample, volume: f32);
}

/// Sink that drops every sample (headless runs, tests)
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioPort for NullAudio {
    fn play_sample(&mut self, _sample: Sample, _volume: f32) {}
}

/// Play the samples for one tick's worth of sim events
pub fn play_events(audio: &mut dyn AudioPort, events: &[GameEvent]) {
    for event in events {
        let (sample, volume) = match event {
            GameEvent::Jump => (Sample::Jump, 0.50),
            GameEvent::DoubleJump => (Sample::DoubleJump, 0.50),
            GameEvent::Stomp => (Sample::Stomp, 0.60),
            GameEvent::TongueOut => (Sample::Tongue, 0.45),
            GameEvent::Eat => (Sample::Eat, 0.60),
            GameEvent::CoinCollected => (Sample::Coin, 0.55),
            GameEvent::Hurt => (Sample::Hurt, 0.65),
            GameEvent::PlayerDied => (Sample::Die, 0.70),
        };
        audio.play_sample(sample, volume);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RecordingAudio {
        played: Vec<Sample>,
    }

    impl AudioPort for RecordingAudio {
        fn play_sample(&mut self, sample: Sample, _volume: f32) {
            self.played.push(sample);
        }
    }

    #[test]
    fn test_events_map_to_samples() {
        let mut audio = RecordingAudio { played: Vec::new() };
        play_events(
            &mut audio,
            &[GameEvent::Jump, GameEvent::CoinCollected, GameEvent::Hurt],
        );
        assert_eq!(audio.played, vec![Sample::Jump, Sample::Coin, Sample::Hurt]);
    }
}
