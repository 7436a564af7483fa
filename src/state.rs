use crate::firework::{Advance, Firework};

// Launches stop once this many frames have elapsed.
pub const FIREWORK_FRAMES: u64 = 500;
pub const MAX_LIVE_FIREWORKS: usize = 15;

pub const MIN_FONT_SIZE: f32 = 40.0;
pub const MAX_FONT_SIZE: f32 = 100.0;
pub const FONT_STEP: f32 = 0.2;

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationState {
    pub frame: u64,
    pub fireworks: Vec<Firework>,
    pub font_size: f32,
    pub font_turn_big: bool,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            frame: 0,
            fireworks: Vec::new(),
            font_size: MIN_FONT_SIZE,
            font_turn_big: true,
        }
    }
}

impl AnimationState {
    pub fn shows_fireworks(&self) -> bool {
        self.frame < FIREWORK_FRAMES || !self.fireworks.is_empty()
    }

    pub fn is_idle(&self) -> bool {
        self.fireworks.is_empty() && self.frame > FIREWORK_FRAMES
    }

    pub fn advance(&mut self, rng: &mut fastrand::Rng, width: f32, height: f32) {
        self.frame += 1;

        if self.fireworks.len() < MAX_LIVE_FIREWORKS && self.frame < FIREWORK_FRAMES {
            self.spawn(rng, width, height);
        }

        for firework in &mut self.fireworks {
            if firework.advance() == Advance::Exploded {
                tracing::debug!(
                    frame = self.frame,
                    x = firework.to_point().x,
                    y = firework.to_point().y,
                    "firework exploded"
                );
            }
        }

        let before = self.fireworks.len();
        self.fireworks.retain(|firework| !firework.is_expired());
        let pruned = before - self.fireworks.len();
        if pruned > 0 {
            tracing::debug!(
                frame = self.frame,
                pruned,
                live = self.fireworks.len(),
                "fireworks faded"
            );
        }

        if self.is_idle() {
            if self.frame == FIREWORK_FRAMES + 1 || pruned > 0 {
                tracing::info!(frame = self.frame, "fireworks over, pulsing caption");
            }
            self.pulse_font();
        }
    }

    fn spawn(&mut self, rng: &mut fastrand::Rng, width: f32, height: f32) {
        let room = MAX_LIVE_FIREWORKS.saturating_sub(self.fireworks.len());
        let count = rng.usize(1..3).min(room);
        let mut launched = 0usize;
        for _ in 0..count {
            match Firework::launch(rng, width, height) {
                Ok(firework) => {
                    self.fireworks.push(firework);
                    launched += 1;
                }
                Err(e) => tracing::warn!(error = %e, width, height, "skipping firework launch"),
            }
        }
        tracing::debug!(
            frame = self.frame,
            launched,
            live = self.fireworks.len(),
            "launched fireworks"
        );
    }

    fn pulse_font(&mut self) {
        if self.font_turn_big {
            self.font_size += FONT_STEP;
            if self.font_size > MAX_FONT_SIZE {
                self.font_turn_big = false;
            }
        } else {
            self.font_size -= FONT_STEP;
            if self.font_size < MIN_FONT_SIZE {
                self.font_turn_big = true;
            }
        }
    }
}
