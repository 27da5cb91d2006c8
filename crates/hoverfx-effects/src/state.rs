//! Effect state management: at most one hover animation runs at a time.

use fastrand::Rng;
use hoverfx_config::{Config, CosmosConfig, TickerConfig};
use hoverfx_core::{AnimationSpeed, EffectKind, Rgb, Viewport};
use ratatui::{Frame, layout::Rect, widgets::Paragraph};

use crate::animations::cosmos::CosmosScene;
use crate::animations::readout::ReadoutFade;
use crate::animations::ticker::{TickerPalette, TickerScene};
use crate::raster::Raster;

/// Longest step the simulation takes at once, so a stalled terminal does not
/// make particles jump.
const MAX_DELTA_MS: u64 = 100;

#[derive(Debug)]
enum ActiveEffect {
    Cosmos(Box<CosmosScene>),
    Ticker(Box<TickerScene>),
}

impl ActiveEffect {
    fn kind(&self) -> EffectKind {
        match self {
            ActiveEffect::Cosmos(_) => EffectKind::Cosmos,
            ActiveEffect::Ticker(_) => EffectKind::Ticker,
        }
    }
}

/// The stage the hover animations are drawn on.
#[derive(Debug)]
pub struct EffectState {
    /// Running animation, if any.
    active: Option<ActiveEffect>,
    /// Ticker readouts still fading after a stop.
    fading: Option<ReadoutFade>,
    cosmos: CosmosConfig,
    ticker: TickerConfig,
    palette: TickerPalette,
    background: Rgb,
    speed: AnimationSpeed,
    /// Last known terminal width.
    last_width: u16,
    /// Last known terminal height.
    last_height: u16,
    /// Last update time in milliseconds of wall time.
    last_update_ms: u64,
    /// Animation time, scaled by the configured speed.
    clock_ms: u64,
    rng: Rng,
}

impl EffectState {
    /// Create an idle stage. A seed makes generated scenes reproducible.
    pub fn new(config: &Config, seed: Option<u64>) -> Self {
        Self {
            active: None,
            fading: None,
            cosmos: config.cosmos.clone(),
            ticker: config.ticker.clone(),
            palette: TickerPalette::new(config.gain_color(), config.loss_color()),
            background: config.background(),
            speed: config.display.speed,
            last_width: 0,
            last_height: 0,
            last_update_ms: 0,
            clock_ms: 0,
            rng: seed.map_or_else(Rng::new, Rng::with_seed),
        }
    }

    pub fn active_kind(&self) -> Option<EffectKind> {
        self.active.as_ref().map(ActiveEffect::kind)
    }

    pub fn is_fading(&self) -> bool {
        self.fading.is_some()
    }

    fn viewport(&self) -> Viewport {
        Viewport::from_cells(self.last_width, self.last_height)
    }

    /// Start an animation. Starting the one already running does nothing.
    pub fn start(&mut self, kind: EffectKind) {
        if self.active_kind() == Some(kind) {
            tracing::debug!(effect = kind.name(), "already running");
            return;
        }
        if let Some(previous) = self.active_kind() {
            self.stop(previous);
        }

        let viewport = self.viewport();
        let now = self.clock_ms;
        let effect = match kind {
            EffectKind::Cosmos => {
                let scene = CosmosScene::generate(viewport, &self.cosmos, now, &mut self.rng);
                let counts = scene.counts();
                tracing::info!(
                    effect = kind.name(),
                    stars = counts.stars,
                    nebulae = counts.nebulae,
                    dust = counts.dust,
                    connections = counts.links,
                    clouds = counts.dark_nebulae + counts.foreground,
                    "effect started"
                );
                ActiveEffect::Cosmos(Box::new(scene))
            }
            EffectKind::Ticker => {
                self.fading = None;
                let scene =
                    TickerScene::start(viewport, &self.ticker, self.palette, now, &mut self.rng);
                tracing::info!(
                    effect = kind.name(),
                    readouts = scene.readouts().len(),
                    code = scene.code_readouts().len(),
                    "effect started"
                );
                ActiveEffect::Ticker(Box::new(scene))
            }
        };
        self.active = Some(effect);
    }

    /// Stop `kind` if it is the one running.
    pub fn stop(&mut self, kind: EffectKind) {
        if self.active_kind() != Some(kind) {
            tracing::debug!(effect = kind.name(), "not running");
            return;
        }
        match self.active.take() {
            Some(ActiveEffect::Ticker(scene)) => {
                self.fading = Some(scene.stop(self.clock_ms));
            }
            Some(ActiveEffect::Cosmos(_)) | None => {}
        }
        tracing::info!(effect = kind.name(), "effect stopped");
    }

    /// Follow the terminal size and advance the running animation.
    pub fn advance(&mut self, width: u16, height: u16, elapsed_ms: u64) {
        if width != self.last_width || height != self.last_height {
            self.last_width = width;
            self.last_height = height;
            let viewport = self.viewport();
            match &mut self.active {
                Some(ActiveEffect::Cosmos(scene)) => {
                    **scene =
                        CosmosScene::generate(viewport, &self.cosmos, self.clock_ms, &mut self.rng);
                    tracing::debug!(width, height, "cosmos regenerated");
                }
                Some(ActiveEffect::Ticker(scene)) => scene.resize(viewport, &mut self.rng),
                None => {}
            }
        }

        let delta_ms = elapsed_ms.saturating_sub(self.last_update_ms).min(MAX_DELTA_MS);
        self.last_update_ms = elapsed_ms;
        self.clock_ms += self.speed.scale_ms(delta_ms);
        let frames = self.speed.frames(delta_ms);

        match &mut self.active {
            Some(ActiveEffect::Cosmos(scene)) => {
                scene.update(frames, self.clock_ms, &mut self.rng)
            }
            Some(ActiveEffect::Ticker(scene)) => scene.update(self.clock_ms, &mut self.rng),
            None => {}
        }

        if self
            .fading
            .as_ref()
            .is_some_and(|fade| fade.is_finished(self.clock_ms))
        {
            self.fading = None;
        }
    }

    /// Rasterize the stage at its current size.
    pub fn draw(&self) -> Raster {
        let mut raster = Raster::new(self.last_width, self.last_height, self.background);
        match &self.active {
            Some(ActiveEffect::Cosmos(scene)) => scene.draw(&mut raster),
            Some(ActiveEffect::Ticker(scene)) => scene.draw(&mut raster, self.clock_ms),
            None => {}
        }
        if let Some(fade) = &self.fading {
            fade.draw(&mut raster, self.clock_ms);
        }
        raster
    }

    /// Advance and render the stage into `area`.
    pub fn render(&mut self, frame: &mut Frame, area: Rect, elapsed_ms: u64) {
        self.advance(area.width, area.height, elapsed_ms);
        let lines = self.draw().into_lines();
        frame.render_widget(Paragraph::new(lines), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        let mut config = Config::default();
        config.cosmos.noise_count = 50;
        config.cosmos.dust_count = 40;
        config.cosmos.star_count_min = 20;
        config.cosmos.star_count_max = 30;
        config
    }

    fn stage() -> EffectState {
        let mut state = EffectState::new(&config(), Some(9));
        state.advance(80, 30, 0);
        state
    }

    fn first_star(state: &EffectState) -> Option<f32> {
        match &state.active {
            Some(ActiveEffect::Cosmos(scene)) => scene.stars().first().map(|s| s.x),
            _ => None,
        }
    }

    #[test]
    fn test_starts_idle() {
        let state = stage();
        assert_eq!(state.active_kind(), None);
        assert!(!state.is_fading());
        let raster = state.draw();
        assert_eq!((raster.cols(), raster.rows()), (80, 30));
    }

    #[test]
    fn test_restart_same_kind_is_noop() {
        let mut state = stage();
        state.start(EffectKind::Cosmos);
        let before = first_star(&state);
        assert!(before.is_some());

        state.start(EffectKind::Cosmos);
        assert_eq!(first_star(&state), before);
        assert_eq!(state.active_kind(), Some(EffectKind::Cosmos));
    }

    #[test]
    fn test_stop_only_matching_kind() {
        let mut state = stage();
        state.start(EffectKind::Cosmos);
        state.stop(EffectKind::Ticker);
        assert_eq!(state.active_kind(), Some(EffectKind::Cosmos));

        state.stop(EffectKind::Cosmos);
        assert_eq!(state.active_kind(), None);
        assert!(!state.is_fading());
    }

    #[test]
    fn test_start_other_kind_replaces() {
        let mut state = stage();
        state.start(EffectKind::Cosmos);
        state.start(EffectKind::Ticker);
        assert_eq!(state.active_kind(), Some(EffectKind::Ticker));

        state.start(EffectKind::Cosmos);
        assert_eq!(state.active_kind(), Some(EffectKind::Cosmos));
        // the replaced ticker leaves its readouts fading
        assert!(state.is_fading());
    }

    #[test]
    fn test_ticker_readouts_fade_after_stop() {
        let mut state = stage();
        state.start(EffectKind::Ticker);
        state.advance(80, 30, 50);
        state.stop(EffectKind::Ticker);
        assert_eq!(state.active_kind(), None);
        assert!(state.is_fading());

        let mut now = 50;
        for _ in 0..3 {
            now += 100;
            state.advance(80, 30, now);
        }
        assert!(!state.is_fading());
    }

    #[test]
    fn test_resize_regenerates_cosmos() {
        let mut state = stage();
        state.start(EffectKind::Cosmos);
        state.advance(120, 50, 16);
        match &state.active {
            Some(ActiveEffect::Cosmos(scene)) => {
                assert_eq!(scene.viewport(), Viewport::from_cells(120, 50));
            }
            _ => panic!("cosmos should be running"),
        }
        assert_eq!(state.draw().cols(), 120);
    }

    #[test]
    fn test_resize_retraces_ticker() {
        let mut state = stage();
        state.start(EffectKind::Ticker);
        state.advance(40, 20, 16);
        match &state.active {
            Some(ActiveEffect::Ticker(scene)) => {
                assert_eq!(scene.viewport(), Viewport::from_cells(40, 20));
            }
            _ => panic!("ticker should be running"),
        }
    }

    #[test]
    fn test_clock_clamps_and_scales() {
        let mut config = config();
        config.display.speed = AnimationSpeed::Fast;
        let mut state = EffectState::new(&config, Some(1));
        state.advance(10, 10, 0);
        state.advance(10, 10, 10_000);
        assert_eq!(state.clock_ms, 150);
        state.advance(10, 10, 10_040);
        assert_eq!(state.clock_ms, 210);
    }
}
