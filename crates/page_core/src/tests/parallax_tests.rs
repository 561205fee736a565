use super::*;
use std::sync::Mutex;

struct Orb {
    id: LayerId,
    offset: Mutex<(f32, f32)>,
}

impl Orb {
    fn new(id: u32) -> Arc<Self> {
        Arc::new(Self {
            id: LayerId(id),
            offset: Mutex::new((0.0, 0.0)),
        })
    }

    fn offset(&self) -> (f32, f32) {
        *self.offset.lock().expect("offset")
    }
}

impl ParallaxLayer for Orb {
    fn layer_id(&self) -> LayerId {
        self.id
    }

    fn set_offset(&self, x: f32, y: f32) {
        *self.offset.lock().expect("offset") = (x, y);
    }
}

const PANEL: Rect = Rect {
    left: 100.0,
    top: 50.0,
    width: 400.0,
    height: 200.0,
};

#[test]
fn deeper_layers_move_further() {
    let near = Orb::new(1);
    let far = Orb::new(2);
    let layers: Vec<Arc<dyn ParallaxLayer>> = vec![near.clone(), far.clone()];
    let parallax = PointerParallax::new(layers);

    // Top-right corner of the panel.
    let offsets = parallax.on_pointer_move(PANEL, 500.0, 50.0);

    assert_eq!(near.offset(), (15.0, -15.0));
    assert_eq!(far.offset(), (30.0, -30.0));
    assert_eq!(offsets[1].layer, LayerId(2));
}

#[test]
fn center_is_neutral_and_leave_resets() {
    let orb = Orb::new(1);
    let parallax = PointerParallax::new(vec![orb.clone() as Arc<dyn ParallaxLayer>]);

    parallax.on_pointer_move(PANEL, 300.0, 150.0);
    assert_eq!(orb.offset(), (0.0, 0.0));

    parallax.on_pointer_move(PANEL, 200.0, 100.0);
    assert_eq!(orb.offset(), (-7.5, -7.5));

    parallax.on_pointer_leave();
    assert_eq!(orb.offset(), (0.0, 0.0));
}

#[test]
fn degenerate_bounds_produce_no_offset() {
    let bounds = Rect {
        width: 0.0,
        ..PANEL
    };
    assert_eq!(offset_for(bounds, 10.0, 10.0, 15.0), (0.0, 0.0));
}
