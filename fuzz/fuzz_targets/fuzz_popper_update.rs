#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tether_core::memory_dom::MemoryDom;
use tether_core::{Dom, Overflow, Rect, Size};
use tether_popper::{BoundariesElement, Placement, Popper, PopperOptions, Side};

const MAX_COORD: f64 = 1.0e6;

#[derive(Arbitrary, Debug)]
struct Geometry {
    x: i32,
    y: i32,
    width: u16,
    height: u16,
}

impl Geometry {
    fn rect(&self) -> Rect {
        let clamp = |v: i32| f64::from(v).clamp(-MAX_COORD, MAX_COORD);
        Rect::new(
            clamp(self.x),
            clamp(self.y),
            f64::from(self.width),
            f64::from(self.height),
        )
    }
}

#[derive(Arbitrary, Debug)]
struct UpdateCase {
    viewport: (u16, u16),
    reference: Geometry,
    popper: Geometry,
    placement: String,
    offset: i16,
    padding: u8,
    scrolling_parent: bool,
    element_boundaries: bool,
    gpu_acceleration: bool,
    moves: Vec<Geometry>,
}

fuzz_target!(|case: UpdateCase| {
    let viewport = Size::new(f64::from(case.viewport.0), f64::from(case.viewport.1));
    let mut dom = MemoryDom::new(viewport);
    let body = dom.body();
    let container = if case.scrolling_parent {
        let pane = dom.element(body, "div", Rect::new(0.0, 0.0, viewport.width, viewport.height));
        dom.set_overflow(pane, Overflow::Auto);
        pane
    } else {
        body
    };
    let reference = dom.element(container, "button", case.reference.rect());
    let popper = dom.element(body, "div", case.popper.rect());

    let boundaries = if case.element_boundaries {
        BoundariesElement::Element(container)
    } else {
        BoundariesElement::Viewport
    };
    let options = PopperOptions::default()
        .placement(Placement::parse_lenient(&case.placement))
        .offset(f64::from(case.offset))
        .boundaries_padding(f64::from(case.padding))
        .boundaries_element(boundaries)
        .gpu_acceleration(case.gpu_acceleration);

    let Ok(mut engine) = Popper::new(&mut dom, Some(reference), popper, options) else {
        return;
    };
    for step in case.moves.iter().take(16) {
        dom.set_rect(reference, step.rect());
        let Some(data) = engine.update(&mut dom) else {
            break;
        };
        let rect = data.popper();
        assert!(rect.left.is_finite() && rect.top.is_finite());
        assert!(Side::ALL.contains(&data.placement.side));
    }
    engine.destroy(&mut dom);
    assert!(engine.update(&mut dom).is_none());
});
