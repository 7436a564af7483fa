use crate::render::{self, Scenery};
use crate::state::AnimationState;
use crate::surface::Surface;

pub struct FireworkShow {
    state: AnimationState,
    rng: fastrand::Rng,
    scenery: Scenery,
}

impl FireworkShow {
    pub fn new(rng: fastrand::Rng, scenery: Scenery) -> Self {
        Self {
            state: AnimationState::default(),
            rng,
            scenery,
        }
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn frame<S: Surface>(&mut self, surface: &mut S) {
        render::draw(surface, &self.state, &self.scenery);
        self.state.advance(&mut self.rng, surface.width(), surface.height());
        tracing::trace!(frame = self.state.frame, live = self.state.fireworks.len(), "frame");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::terminal::TerminalSurface;

    #[test]
    fn first_frame_renders_empty_sky_then_launches() {
        let mut surface = TerminalSurface::new(80, 45, 8.0);
        let mut show = FireworkShow::new(fastrand::Rng::with_seed(11), Scenery::default());
        show.frame(&mut surface);
        assert_eq!(show.state().frame, 1);
        assert!(!show.state().fireworks.is_empty());
        // rendered before the launch, so the sky is still blank
        for y in 0..90 {
            for x in 0..80 {
                assert_eq!(surface.pixel(x, y), render::BACKGROUND);
            }
        }
    }

    #[test]
    fn same_seed_same_show() {
        let mut a = FireworkShow::new(fastrand::Rng::with_seed(5), Scenery::default());
        let mut b = FireworkShow::new(fastrand::Rng::with_seed(5), Scenery::default());
        let mut sa = TerminalSurface::new(40, 20, 8.0);
        let mut sb = TerminalSurface::new(40, 20, 8.0);
        for _ in 0..120 {
            a.frame(&mut sa);
            b.frame(&mut sb);
        }
        assert_eq!(a.state(), b.state());
    }

    #[test]
    fn caption_appears_after_the_show() {
        let scenery = Scenery {
            caption: "HNY".to_string(),
            ..Scenery::default()
        };
        let mut show = FireworkShow::new(fastrand::Rng::with_seed(8), scenery);
        let mut surface = TerminalSurface::new(80, 45, 8.0);
        while show.state().shows_fireworks() {
            show.frame(&mut surface);
            assert!(show.state().frame < 5000);
        }
        show.frame(&mut surface);
        // anchor (300, 300) at scale 8: col 37, row (300 - size / 2) / 16
        let row = ((300.0 - 40.0 / 2.0) / 16.0f32).floor() as usize;
        assert_eq!(surface.glyph_at(37, row), Some('H'));
    }
}
