//! Session tests

use crate::config::HarnessConfig;
use crate::driver::RefreshSource;
use crate::error::HarnessError;
use crate::input::{Button, ButtonMask, KeyBinding};
use crate::test_utils::{DeviceProbe, FakeDevice, FakeEngine, ramp};

use super::Session;

#[derive(Default)]
struct CountingRefresh {
    requests: u32,
}

impl RefreshSource for CountingRefresh {
    fn request_refresh(&mut self) {
        self.requests += 1;
    }
}

/// 48 kHz device with the default 1/120 s threshold: 400 samples
fn session(engine: FakeEngine) -> (Session<FakeEngine, FakeDevice>, DeviceProbe) {
    session_with(engine, HarnessConfig::default())
}

fn session_with(
    engine: FakeEngine,
    config: HarnessConfig,
) -> (Session<FakeEngine, FakeDevice>, DeviceProbe) {
    let (device, probe) = FakeDevice::new(48_000);
    (Session::new(engine, device, &config).unwrap(), probe)
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_new_derives_threshold_from_device_rate() {
    let (session, _probe) = session(FakeEngine::default());
    assert_eq!(session.queue().min_flush_size(), 400);
    assert_eq!(session.current_mask(), ButtonMask::empty());
    assert!(session.is_running());
}

#[test]
fn test_new_rejects_invalid_config() {
    let mut config = HarnessConfig::default();
    config.audio.flush_rate_hz = 0;
    let (device, _probe) = FakeDevice::new(48_000);

    let result = Session::new(FakeEngine::default(), device, &config);
    assert!(matches!(result, Err(HarnessError::Config(_))));
}

// ============================================================================
// Frame Loop
// ============================================================================

#[test]
fn test_refresh_always_rearms() {
    let (mut session, _probe) = session(FakeEngine::default());
    let mut refresh = CountingRefresh::default();

    session.on_refresh(0.0, &mut refresh).unwrap();
    session.open_settings();
    session.on_refresh(16.0, &mut refresh).unwrap();
    session.on_refresh(32.0, &mut refresh).unwrap();

    assert_eq!(refresh.requests, 3);
    assert_eq!(session.engine().steps.len(), 1);
}

#[test]
fn test_refresh_rearms_after_playback_error() {
    let (mut session, probe) = session(FakeEngine::with_blocks([ramp(0, 400)]));
    let mut refresh = CountingRefresh::default();
    probe.fail_next();

    let result = session.on_refresh(0.0, &mut refresh);
    assert!(matches!(result, Err(HarnessError::Playback(_))));
    assert_eq!(refresh.requests, 1);
    assert_eq!(session.audio_stats().failed_flushes, 1);
}

#[test]
fn test_frames_stream_to_device_in_order() {
    let blocks = (0..10).map(|i| ramp(i * 150, 150));
    let (mut session, probe) = session(FakeEngine::with_blocks(blocks));
    let mut refresh = CountingRefresh::default();

    for frame in 0..10 {
        session.on_refresh(frame as f64 * 16.7, &mut refresh).unwrap();
        if frame % 3 == 2 {
            probe.complete_next();
        }
    }
    while probe.complete_next() {}

    assert_eq!(probe.overlaps(), 0);
    let pending = session.queue().pending_len();
    let mut stream = probe.played();
    stream.extend(ramp(1500 - pending, pending));
    assert_eq!(stream, ramp(0, 1500));
}

#[test]
fn test_suspended_session_produces_no_audio() {
    let (mut session, probe) = session(FakeEngine::with_blocks([ramp(0, 1000)]));
    let mut refresh = CountingRefresh::default();
    session.open_settings();

    for frame in 0..4 {
        session.on_refresh(frame as f64 * 16.0, &mut refresh).unwrap();
    }

    assert!(session.engine().steps.is_empty());
    assert_eq!(probe.unit_count(), 0);
    assert_eq!(session.queue().pending_len(), 0);
}

// ============================================================================
// Input
// ============================================================================

#[test]
fn test_key_transitions_publish_mask() {
    let (mut session, _probe) = session(FakeEngine::default());

    assert!(session.key_down("j"));
    assert!(session.key_down("ArrowLeft"));
    assert!(session.key_up("j"));

    assert_eq!(
        session.engine().masks,
        vec![
            ButtonMask::A,
            ButtonMask::A | ButtonMask::LEFT,
            ButtonMask::LEFT,
        ]
    );
}

#[test]
fn test_unknown_key_is_not_published() {
    let (mut session, _probe) = session(FakeEngine::default());

    assert!(!session.key_down("F13"));
    assert!(!session.key_up("F13"));

    assert!(session.engine().masks.is_empty());
    assert_eq!(session.current_mask(), ButtonMask::empty());
}

#[test]
fn test_release_all_publishes_empty_mask() {
    let (mut session, _probe) = session(FakeEngine::default());
    session.key_down("Enter");
    session.release_all();

    assert_eq!(session.current_mask(), ButtonMask::empty());
    assert_eq!(session.engine().masks.last(), Some(&ButtonMask::empty()));
}

#[test]
fn test_set_binding_takes_effect() {
    let (mut session, _probe) = session(FakeEngine::default());
    session.set_binding(KeyBinding::from_pairs([("z", Button::Start)]));

    assert!(!session.key_down("Enter"));
    assert!(session.key_down("z"));
    assert_eq!(session.current_mask(), ButtonMask::START);
}

// ============================================================================
// Cartridge Loading
// ============================================================================

#[test]
fn test_load_cart_passes_bytes_through() {
    let (mut session, _probe) = session(FakeEngine::default());
    let mut image = b"NES\x1A".to_vec();
    image.extend_from_slice(&[1, 1, 0x10, 0, 0, 0, 0, 0, 0, 0, 0, 0]);

    session.load_cart(&image).unwrap();

    assert_eq!(session.engine().carts, vec![image]);
    assert_eq!(session.cart_info().map(|info| info.mapper), Some(1));
}

#[test]
fn test_empty_cart_never_reaches_engine() {
    let (mut session, _probe) = session(FakeEngine::default());

    let err = session.load_cart(&[]).unwrap_err();
    assert!(matches!(err, HarnessError::EmptyCart));
    assert!(session.engine().carts.is_empty());
}

#[test]
fn test_engine_rejection_is_reported() {
    let mut engine = FakeEngine::default();
    engine.reject_cart = true;
    let (mut session, _probe) = session(engine);

    let err = session.load_cart(&[0xFF; 32]).unwrap_err();
    assert!(matches!(err, HarnessError::Engine(_)));
}

#[test]
fn test_cart_swap_keeps_audio_by_default() {
    let (mut session, probe) = session(FakeEngine::with_blocks([ramp(0, 400), ramp(400, 100)]));
    let mut refresh = CountingRefresh::default();
    session.on_refresh(0.0, &mut refresh).unwrap();
    session.on_refresh(16.0, &mut refresh).unwrap();
    assert_eq!(session.queue().pending_len(), 100);

    session.load_cart(&[1, 2, 3]).unwrap();

    assert_eq!(session.queue().pending_len(), 100);
    assert!(session.queue().is_in_flight());
    assert_eq!(probe.unit_count(), 1);
}

#[test]
fn test_cart_swap_can_discard_pending() {
    let mut config = HarnessConfig::default();
    config.audio.discard_on_cart_swap = true;
    let (mut session, probe) =
        session_with(FakeEngine::with_blocks([ramp(0, 400), ramp(400, 100)]), config);
    let mut refresh = CountingRefresh::default();
    session.on_refresh(0.0, &mut refresh).unwrap();
    session.on_refresh(16.0, &mut refresh).unwrap();

    session.load_cart(&[1, 2, 3]).unwrap();

    assert_eq!(session.queue().pending_len(), 0);
    // The playing unit is not cancelled
    assert!(session.queue().is_in_flight());
    assert!(probe.complete_next());
    assert_eq!(probe.played(), ramp(0, 400));
}

#[test]
fn test_cart_swap_republishes_held_buttons() {
    let (mut session, _probe) = session(FakeEngine::default());
    session.key_down("k");
    session.load_cart(&[0xAA]).unwrap();

    assert_eq!(session.engine().masks.last(), Some(&ButtonMask::B));
}

#[test]
fn test_refresh_renders_frame() {
    let mut engine = FakeEngine::default();
    engine.fill = 0xFF10_2030;
    let (mut session, _probe) = session(engine);
    let mut refresh = CountingRefresh::default();

    session.on_refresh(0.0, &mut refresh).unwrap();

    assert_eq!(session.pixels().frame_count(), 1);
    assert_eq!(&session.pixels().rgba()[..4], &[0x10, 0x20, 0x30, 0xFF]);
}
