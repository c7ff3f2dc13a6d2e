use crate::device::GraphicsDevice;

use super::{RenderState, TextureHandle, floats_differ};

/// Mirror of what is currently bound on one device.
///
/// Owned by whoever drives rendering for that device and passed explicitly to
/// every bind. Any code that touches the device directly can desynchronize it;
/// call [`restore`](Self::restore) (or [`invalidate`](Self::invalidate)) afterwards.
///
/// Each rule below is applied independently on [`bind`](Self::bind):
/// - texture: rebind when the handle changed or the device's context
///   generation advanced; handle 0 turns texturing off
/// - blend: `(One, Zero)` turns blending off, anything else turns it on and
///   re-issues the blend function
/// - alpha test: `Always` turns the test off, anything else turns it on and
///   re-issues the comparison
/// - line width: only for line topologies, compared against the width last
///   issued to the device
#[derive(Debug, Clone)]
pub struct StateCache {
    state_bound: bool,
    active: RenderState,

    texturing_enabled: bool,
    /// `None` once invalidated: the next bind always hits the device.
    texture_binding: Option<TextureHandle>,
    generation: u64,

    blending_enabled: bool,
    alpha_test_enabled: bool,
    line_width: Option<f32>,
}

impl Default for StateCache {
    fn default() -> Self {
        Self {
            state_bound: false,
            active: RenderState::DEFAULT,
            texturing_enabled: false,
            texture_binding: Some(TextureHandle::NONE),
            generation: 0,
            blending_enabled: false,
            alpha_test_enabled: false,
            line_width: None,
        }
    }
}

impl StateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last state passed to [`bind`](Self::bind).
    #[inline]
    pub fn active(&self) -> &RenderState {
        &self.active
    }

    #[inline]
    pub fn is_bound(&self) -> bool {
        self.state_bound
    }

    #[inline]
    pub fn texturing_enabled(&self) -> bool {
        self.texturing_enabled
    }

    #[inline]
    pub fn blending_enabled(&self) -> bool {
        self.blending_enabled
    }

    #[inline]
    pub fn alpha_test_enabled(&self) -> bool {
        self.alpha_test_enabled
    }

    /// Forgets everything known about the device; the next bind re-issues
    /// every rule. Capability toggles keep their last known values.
    pub fn invalidate(&mut self) {
        self.state_bound = false;
        self.texture_binding = None;
        self.line_width = None;
    }

    /// Makes the device match `state` with the fewest calls relative to the
    /// last bound state.
    pub fn bind(&mut self, device: &mut dyn GraphicsDevice, state: &RenderState) {
        self.bind_texture(device, state.texture);

        let active = self.active;

        if !self.state_bound || state.blend != active.blend {
            if state.blend.is_identity() {
                if self.blending_enabled {
                    log::trace!("state: blending off");
                    device.enable_blending(false);
                    self.blending_enabled = false;
                }
            } else {
                if !self.blending_enabled {
                    log::trace!("state: blending on");
                    device.enable_blending(true);
                    self.blending_enabled = true;
                }
                log::trace!("state: blend {:?}", state.blend);
                device.set_blend_function(state.blend);
            }
        }

        if !self.state_bound || state.alpha != active.alpha {
            if state.alpha.is_disabled() {
                if self.alpha_test_enabled {
                    log::trace!("state: alpha test off");
                    device.enable_alpha_test(false);
                    self.alpha_test_enabled = false;
                }
            } else {
                if !self.alpha_test_enabled {
                    log::trace!("state: alpha test on");
                    device.enable_alpha_test(true);
                    self.alpha_test_enabled = true;
                }
                log::trace!("state: alpha {:?}", state.alpha);
                device.set_alpha_function(state.alpha);
            }
        }

        if state.mode.is_line()
            && self.line_width.is_none_or(|w| floats_differ(w, state.line_width))
        {
            log::trace!("state: line width {}", state.line_width);
            device.set_line_width(state.line_width);
            self.line_width = Some(state.line_width);
        }

        self.active = *state;
        self.state_bound = true;
    }

    /// Re-asserts the texturing/blending/alpha-test toggles from the cache, then
    /// binds `state` (or the cached active state when `None`).
    ///
    /// Use after unrelated code may have changed the device behind our back.
    pub fn restore(&mut self, device: &mut dyn GraphicsDevice, state: Option<&RenderState>) {
        let target = state.copied().unwrap_or(self.active);

        device.enable_alpha_test(self.alpha_test_enabled);
        device.enable_blending(self.blending_enabled);
        device.enable_texturing(self.texturing_enabled);

        self.bind(device, &target);
    }

    fn bind_texture(&mut self, device: &mut dyn GraphicsDevice, texture: TextureHandle) {
        let generation = device.context_generation();
        if self.texture_binding == Some(texture) && generation == self.generation {
            return;
        }

        let stale = generation != self.generation || self.texture_binding.is_none();

        if !texture.is_none() {
            if !self.texturing_enabled || stale {
                log::trace!("state: texturing on");
                device.enable_texturing(true);
                self.texturing_enabled = true;
            }
            log::trace!("state: bind texture {}", texture.raw());
            device.bind_texture(texture);
        } else if self.texturing_enabled || stale {
            log::trace!("state: texturing off");
            device.enable_texturing(false);
            self.texturing_enabled = false;
        }

        self.generation = generation;
        self.texture_binding = Some(texture);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DeviceCall, RecordingDevice};
    use crate::state::{AlphaFunc, AlphaTest, BlendFactors, PrimitiveMode};

    fn textured(raw: u32) -> RenderState {
        RenderState {
            texture: TextureHandle::new(raw),
            ..RenderState::DEFAULT
        }
    }

    // ── texture ───────────────────────────────────────────────────────────

    #[test]
    fn first_bind_of_default_state_is_silent() {
        let mut dev = RecordingDevice::new();
        let mut cache = StateCache::new();
        cache.bind(&mut dev, &RenderState::DEFAULT);
        assert!(dev.calls().is_empty());
        assert!(cache.is_bound());
    }

    #[test]
    fn texture_bound_once_then_suppressed() {
        let mut dev = RecordingDevice::new();
        let mut cache = StateCache::new();

        cache.bind(&mut dev, &textured(5));
        assert_eq!(
            dev.take_calls(),
            vec![
                DeviceCall::EnableTexturing(true),
                DeviceCall::BindTexture(TextureHandle::new(5)),
            ]
        );

        cache.bind(&mut dev, &textured(5));
        assert!(dev.calls().is_empty());

        cache.bind(&mut dev, &textured(7));
        assert_eq!(dev.take_calls(), vec![DeviceCall::BindTexture(TextureHandle::new(7))]);
    }

    #[test]
    fn texture_zero_disables_texturing() {
        let mut dev = RecordingDevice::new();
        let mut cache = StateCache::new();

        cache.bind(&mut dev, &textured(5));
        dev.clear();
        cache.bind(&mut dev, &textured(0));
        assert_eq!(dev.take_calls(), vec![DeviceCall::EnableTexturing(false)]);
        assert!(!cache.texturing_enabled());
    }

    #[test]
    fn context_generation_forces_rebind() {
        let mut dev = RecordingDevice::new();
        let mut cache = StateCache::new();

        cache.bind(&mut dev, &textured(5));
        dev.clear();

        dev.advance_generation();
        cache.bind(&mut dev, &textured(5));
        assert_eq!(
            dev.take_calls(),
            vec![
                DeviceCall::EnableTexturing(true),
                DeviceCall::BindTexture(TextureHandle::new(5)),
            ]
        );

        // Generation is now in sync again.
        cache.bind(&mut dev, &textured(5));
        assert!(dev.calls().is_empty());
    }

    #[test]
    fn texture_zero_after_generation_change_disables_texturing() {
        let mut dev = RecordingDevice::new();
        let mut cache = StateCache::new();

        dev.advance_generation();
        cache.bind(&mut dev, &RenderState::DEFAULT);
        assert_eq!(dev.take_calls(), vec![DeviceCall::EnableTexturing(false)]);
        assert!(!cache.texturing_enabled());

        cache.bind(&mut dev, &RenderState::DEFAULT);
        assert!(dev.calls().is_empty());
    }

    // ── blend ─────────────────────────────────────────────────────────────

    #[test]
    fn blend_enable_then_function_change_then_disable() {
        let mut dev = RecordingDevice::new();
        let mut cache = StateCache::new();
        cache.bind(&mut dev, &RenderState::DEFAULT);

        let alpha = RenderState {
            blend: BlendFactors::ALPHA,
            ..RenderState::DEFAULT
        };
        cache.bind(&mut dev, &alpha);
        assert_eq!(
            dev.take_calls(),
            vec![
                DeviceCall::EnableBlending(true),
                DeviceCall::SetBlendFunction(BlendFactors::ALPHA),
            ]
        );

        let additive = RenderState {
            blend: BlendFactors::ADDITIVE,
            ..RenderState::DEFAULT
        };
        cache.bind(&mut dev, &additive);
        assert_eq!(
            dev.take_calls(),
            vec![DeviceCall::SetBlendFunction(BlendFactors::ADDITIVE)]
        );

        cache.bind(&mut dev, &RenderState::DEFAULT);
        assert_eq!(dev.take_calls(), vec![DeviceCall::EnableBlending(false)]);
        assert!(!cache.blending_enabled());
    }

    #[test]
    fn unchanged_blend_is_not_reissued() {
        let mut dev = RecordingDevice::new();
        let mut cache = StateCache::new();
        let alpha = RenderState {
            blend: BlendFactors::ALPHA,
            ..RenderState::DEFAULT
        };

        cache.bind(&mut dev, &alpha);
        dev.clear();
        cache.bind(&mut dev, &alpha);
        assert!(dev.calls().is_empty());
    }

    // ── alpha test ────────────────────────────────────────────────────────

    #[test]
    fn alpha_test_follows_blend_policy() {
        let mut dev = RecordingDevice::new();
        let mut cache = StateCache::new();
        cache.bind(&mut dev, &RenderState::DEFAULT);

        let half = AlphaTest::new(AlphaFunc::Greater, 0.5);
        let half_state = RenderState {
            alpha: half,
            ..RenderState::DEFAULT
        };
        cache.bind(&mut dev, &half_state);
        assert_eq!(
            dev.take_calls(),
            vec![DeviceCall::EnableAlphaTest(true), DeviceCall::SetAlphaFunction(half)]
        );

        // Reference change alone re-issues the comparison.
        let quarter = AlphaTest::new(AlphaFunc::Greater, 0.25);
        let quarter_state = RenderState {
            alpha: quarter,
            ..RenderState::DEFAULT
        };
        cache.bind(&mut dev, &quarter_state);
        assert_eq!(dev.take_calls(), vec![DeviceCall::SetAlphaFunction(quarter)]);

        cache.bind(&mut dev, &RenderState::DEFAULT);
        assert_eq!(dev.take_calls(), vec![DeviceCall::EnableAlphaTest(false)]);
    }

    // ── line width ────────────────────────────────────────────────────────

    #[test]
    fn line_width_only_for_lines() {
        let mut dev = RecordingDevice::new();
        let mut cache = StateCache::new();

        let wide_polygon = RenderState {
            line_width: 4.0,
            ..RenderState::DEFAULT
        };
        cache.bind(&mut dev, &wide_polygon);
        assert!(dev.take_calls().is_empty());

        let lines = RenderState {
            mode: PrimitiveMode::Lines,
            line_width: 4.0,
            ..RenderState::DEFAULT
        };
        cache.bind(&mut dev, &lines);
        assert_eq!(dev.take_calls(), vec![DeviceCall::SetLineWidth(4.0)]);

        cache.bind(&mut dev, &lines);
        assert!(dev.take_calls().is_empty());

        let thin = RenderState {
            line_width: 1.0,
            ..lines
        };
        cache.bind(&mut dev, &thin);
        assert_eq!(dev.take_calls(), vec![DeviceCall::SetLineWidth(1.0)]);
    }

    // ── restore / invalidate ──────────────────────────────────────────────

    #[test]
    fn restore_reasserts_toggles_then_binds() {
        let mut dev = RecordingDevice::new();
        let mut cache = StateCache::new();
        let state = RenderState {
            blend: BlendFactors::ALPHA,
            ..textured(9)
        };
        cache.bind(&mut dev, &state);
        dev.clear();

        cache.restore(&mut dev, None);
        assert_eq!(
            dev.take_calls(),
            vec![
                DeviceCall::EnableAlphaTest(false),
                DeviceCall::EnableBlending(true),
                DeviceCall::EnableTexturing(true),
            ]
        );
    }

    #[test]
    fn restore_with_explicit_state_binds_it() {
        let mut dev = RecordingDevice::new();
        let mut cache = StateCache::new();
        cache.bind(&mut dev, &RenderState::DEFAULT);
        dev.clear();

        cache.restore(&mut dev, Some(&textured(3)));
        let calls = dev.take_calls();
        assert_eq!(
            calls[..3],
            [
                DeviceCall::EnableAlphaTest(false),
                DeviceCall::EnableBlending(false),
                DeviceCall::EnableTexturing(false),
            ]
        );
        assert_eq!(
            calls[3..],
            [
                DeviceCall::EnableTexturing(true),
                DeviceCall::BindTexture(TextureHandle::new(3)),
            ]
        );
        assert_eq!(cache.active().texture, TextureHandle::new(3));
    }

    #[test]
    fn invalidate_reissues_everything() {
        let mut dev = RecordingDevice::new();
        let mut cache = StateCache::new();
        let state = RenderState {
            blend: BlendFactors::ALPHA,
            mode: PrimitiveMode::LineStrip,
            line_width: 2.0,
            ..textured(4)
        };
        cache.bind(&mut dev, &state);
        dev.clear();

        cache.invalidate();
        cache.bind(&mut dev, &state);
        assert_eq!(
            dev.take_calls(),
            vec![
                DeviceCall::EnableTexturing(true),
                DeviceCall::BindTexture(TextureHandle::new(4)),
                DeviceCall::SetBlendFunction(BlendFactors::ALPHA),
                DeviceCall::SetLineWidth(2.0),
            ]
        );
    }
}
