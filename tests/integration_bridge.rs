use webtex::engine::harness::{test_pattern, HarnessEngine, HarnessEvent};
use webtex::{
    BridgeConfig, BrowserEngine, EngineSettings, Error, HostWindow, PaintElement, PaintSurface,
    RowOrigin, SurfaceOptions, ViewRect,
};

struct FixedWindow(u64);

impl HostWindow for FixedWindow {
    fn native_handle(&self) -> Option<u64> {
        Some(self.0)
    }
}

struct NoWindow;

impl HostWindow for NoWindow {
    fn native_handle(&self) -> Option<u64> {
        None
    }
}

fn engine() -> HarnessEngine {
    let mut engine = HarnessEngine::new();
    let settings =
        EngineSettings::for_module_dir(&engine.module_directory(), &BridgeConfig::default());
    engine.initialize(&settings).expect("harness init");
    engine
}

#[test]
fn create_then_view_rect_matches_requested_dimensions() {
    let mut engine = engine();
    for (w, h) in [(1, 1), (800, 600), (1024, 1024), (1920, 1080)] {
        let opts = SurfaceOptions::new("about:blank")
            .with_size(w, h)
            .with_window_handle(0x1);
        let surface = PaintSurface::create(&mut engine, None, opts).unwrap();
        assert_eq!(surface.view_rect(), ViewRect::new(w, h));
    }
}

#[test]
fn window_handle_resolution() {
    let mut engine = engine();

    // explicit handle wins
    let opts = SurfaceOptions::new("about:blank").with_window_handle(0x7);
    assert!(PaintSurface::create(&mut engine, Some(&NoWindow), opts).is_ok());

    // falls back to the host window
    let opts = SurfaceOptions::new("about:blank");
    assert!(PaintSurface::create(&mut engine, Some(&FixedWindow(0x7)), opts).is_ok());

    // neither: construction aborts, nothing partially built
    let sessions_before = engine.session_count();
    let opts = SurfaceOptions::new("about:blank");
    let err = PaintSurface::create(&mut engine, Some(&NoWindow), opts).unwrap_err();
    assert!(matches!(err, Error::WindowResolution));
    let err = PaintSurface::create(&mut engine, None, SurfaceOptions::new("about:blank"))
        .unwrap_err();
    assert!(matches!(err, Error::WindowResolution));
    assert_eq!(engine.session_count(), sessions_before);
}

#[test]
fn creation_sends_the_initial_focus_event() {
    let mut engine = engine();
    let opts = SurfaceOptions::new("https://example.com").with_window_handle(0x1);
    let mut surface = PaintSurface::create(&mut engine, None, opts).unwrap();
    assert!(engine.session_focused(0));
    assert_eq!(engine.session_url(0).as_deref(), Some("https://example.com"));

    surface.set_focused(false);
    assert!(!engine.session_focused(0));
    surface.set_focused(true);
    assert!(engine.session_focused(0));
}

#[test]
fn resize_then_stale_paint_is_rejected() {
    let mut engine = engine();
    let opts = SurfaceOptions::new("about:blank")
        .with_size(800, 600)
        .with_window_handle(0x1);
    let mut surface = PaintSurface::create(&mut engine, None, opts).unwrap();
    assert_eq!(surface.view_rect(), ViewRect::new(800, 600));

    surface.set_width(400).unwrap();
    assert_eq!(surface.view_rect(), ViewRect::new(400, 600));

    // paint for the new dimensions lands
    surface
        .write_paint_data(&vec![1u8; 400 * 600 * 4], RowOrigin::BottomLeft)
        .unwrap();

    // paint still shaped for the old dimensions is the stale race; rejected
    let err = surface
        .write_paint_data(&vec![1u8; 800 * 600 * 4], RowOrigin::BottomLeft)
        .unwrap_err();
    assert!(matches!(
        err,
        Error::PaintShapeMismatch {
            expected,
            actual,
            width: 400,
            height: 600,
        } if expected == 400 * 600 * 4 && actual == 800 * 600 * 4
    ));
    // prior contents survive the rejection
    assert!(surface.snapshot().iter().all(|&p| p == 1));
}

#[test]
fn resize_is_idempotent() {
    let mut engine = engine();
    let opts = SurfaceOptions::new("about:blank")
        .with_size(640, 480)
        .with_window_handle(0x1);
    let mut surface = PaintSurface::create(&mut engine, None, opts).unwrap();

    surface.set_width(640).unwrap();
    surface.set_width(640).unwrap();
    assert_eq!(surface.view_rect(), ViewRect::new(640, 480));
    assert_eq!(surface.snapshot().len(), 640 * 480 * 4);
}

#[test]
fn popup_paint_is_reported_and_does_not_touch_the_buffer() {
    let mut engine = engine();
    let opts = SurfaceOptions::new("about:blank")
        .with_size(8, 8)
        .with_window_handle(0x1);
    let surface = PaintSurface::create(&mut engine, None, opts).unwrap();

    // settle the initial repaint so the buffer holds a known frame
    engine.do_message_loop_work();
    let before = surface.snapshot();
    assert_eq!(before, test_pattern(8, 8));

    engine.queue_event(
        0,
        HarnessEvent::Paint {
            element: PaintElement::Popup,
            data: vec![9u8; 8 * 8 * 4],
            width: 8,
            height: 8,
        },
    );
    engine.do_message_loop_work();

    let errors = engine.take_errors();
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        errors[0],
        Error::UnsupportedElement(PaintElement::Popup)
    ));
    assert_eq!(surface.snapshot(), before);
}

#[test]
fn load_error_is_reported_with_full_context() {
    let mut engine = engine();
    let opts = SurfaceOptions::new("http://x")
        .with_size(8, 8)
        .with_window_handle(0x1);
    let surface = PaintSurface::create(&mut engine, None, opts).unwrap();
    engine.do_message_loop_work();
    let last_good = surface.snapshot();

    engine.queue_event(
        0,
        HarnessEvent::LoadError {
            frame: "frame1".to_string(),
            code: 404,
            text: "Not Found".to_string(),
            url: "http://x".to_string(),
        },
    );
    engine.do_message_loop_work();

    let errors = engine.take_errors();
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        Error::Load {
            frame,
            code,
            text,
            url,
        } => {
            assert_eq!(frame, "frame1");
            assert_eq!(*code, 404);
            assert_eq!(text, "Not Found");
            assert_eq!(url, "http://x");
        }
        other => panic!("unexpected error: {other}"),
    }
    // the surface keeps serving its last good frame
    assert_eq!(surface.snapshot(), last_good);
}

#[test]
fn load_end_reaches_the_subscriber() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let mut engine = engine();
    let opts = SurfaceOptions::new("about:blank")
        .with_size(8, 8)
        .with_window_handle(0x1);
    let mut surface = PaintSurface::create(&mut engine, None, opts).unwrap();

    let seen: Rc<RefCell<Vec<(String, u16)>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    surface.on_load_end(move |ev| sink.borrow_mut().push((ev.frame.clone(), ev.http_code)));

    engine.queue_event(
        0,
        HarnessEvent::LoadEnd {
            frame: "main".to_string(),
            http_code: 200,
        },
    );
    engine.do_message_loop_work();

    assert_eq!(seen.borrow().as_slice(), &[("main".to_string(), 200)]);
    assert!(engine.take_errors().is_empty());
}

#[test]
fn scripted_paint_for_stale_dimensions_is_recorded_not_applied() {
    let mut engine = engine();
    let opts = SurfaceOptions::new("about:blank")
        .with_size(16, 16)
        .with_window_handle(0x1);
    let mut surface = PaintSurface::create(&mut engine, None, opts).unwrap();
    engine.do_message_loop_work();

    // shrink the surface; a paint shaped for the old size is now in flight
    surface.resize(8, 8).unwrap();
    engine.queue_event(
        0,
        HarnessEvent::Paint {
            element: PaintElement::View,
            data: vec![3u8; 16 * 16 * 4],
            width: 16,
            height: 16,
        },
    );
    engine.do_message_loop_work();

    let errors = engine.take_errors();
    assert!(errors
        .iter()
        .any(|e| matches!(e, Error::PaintShapeMismatch { .. })));
    // the repaint at the new rect still landed on the same tick
    assert_eq!(surface.snapshot(), test_pattern(8, 8));
}
