//! Scripted input provider: timeline of input frames keyed by match tick.

use bevy::prelude::*;
use std::collections::VecDeque;

use crate::combat::MatchClock;
use crate::components::FighterInput;

/// One timeline entry: on `tick`, `FighterInput` becomes `input`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptFrame {
    pub tick: u64,
    pub input: FighterInput,
}

/// Replays a fixed input timeline (demos, regression scenarios).
///
/// Между кадрами input не трогается: уровни (guard, move) держатся,
/// edge-флаги сбрасывает ядро.
#[derive(Component, Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: VecDeque<ScriptFrame>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a frame; frames are kept sorted by tick (stable for equal ticks).
    pub fn at(mut self, tick: u64, input: FighterInput) -> Self {
        let index = self.frames.partition_point(|frame| frame.tick <= tick);
        self.frames.insert(index, ScriptFrame { tick, input });
        self
    }

    pub fn is_finished(&self) -> bool {
        self.frames.is_empty()
    }

    /// Pops every frame due at or before `tick`; the last one wins.
    pub fn take_due(&mut self, tick: u64) -> Option<FighterInput> {
        let mut latest = None;
        while self.frames.front().is_some_and(|frame| frame.tick <= tick) {
            latest = self.frames.pop_front().map(|frame| frame.input);
        }
        latest
    }
}

/// System: apply due script frames.
pub fn drive_scripted_input(
    clock: Res<MatchClock>,
    mut scripts: Query<(&mut ScriptedInput, &mut FighterInput)>,
) {
    for (mut script, mut input) in scripts.iter_mut() {
        if let Some(frame) = script.take_due(clock.tick) {
            *input = frame;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_sorted_and_due() {
        let jab = FighterInput {
            attack_pressed: [true, false, false],
            ..default()
        };
        let guard = FighterInput {
            guard_held: true,
            ..default()
        };

        let mut script = ScriptedInput::new().at(10, guard).at(3, jab);

        assert_eq!(script.take_due(2), None);
        assert_eq!(script.take_due(3), Some(jab));
        assert_eq!(script.take_due(9), None);
        assert_eq!(script.take_due(12), Some(guard));
        assert!(script.is_finished());
    }

    #[test]
    fn test_skipped_ticks_last_frame_wins() {
        let left = FighterInput {
            move_axis: -1.0,
            ..default()
        };
        let right = FighterInput {
            move_axis: 1.0,
            ..default()
        };

        let mut script = ScriptedInput::new().at(1, left).at(2, right);
        assert_eq!(script.take_due(5), Some(right));
    }
}
