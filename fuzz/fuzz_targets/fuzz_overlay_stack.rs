#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tether_core::memory_dom::MemoryDom;
use tether_core::{Event, KeyCode, Size};
use tether_overlay::{OpenRequest, OverlayConfig, OverlayCoordinator};
use web_time::{Duration, Instant};

#[derive(Arbitrary, Debug)]
enum Op {
    Open { id: u8, fade: bool },
    Close { id: u8 },
    Escape,
    ClickBackdrop,
    Advance { millis: u16 },
}

fuzz_target!(|ops: Vec<Op>| {
    let mut dom = MemoryDom::new(Size::new(800.0, 600.0));
    let overlays = OverlayCoordinator::new(OverlayConfig::default());
    let mut now = Instant::now();
    let mut last_z = None;

    for op in ops.into_iter().take(256) {
        match op {
            Op::Open { id, fade } => {
                let Some(z) = overlays.next_z_index() else {
                    continue;
                };
                if let Some(prev) = last_z {
                    assert!(z > prev);
                }
                last_z = Some(z);
                let request = OpenRequest::new(z).modal_fade(fade);
                overlays.open(&mut dom, &format!("o{}", id % 8), request, now);
            }
            Op::Close { id } => overlays.close(&mut dom, &format!("o{}", id % 8), now),
            Op::Escape => {
                overlays.handle_event(&mut dom, &Event::key(KeyCode::Escape), now);
            }
            Op::ClickBackdrop => {
                if let Some(backdrop) = overlays.backdrop() {
                    overlays.handle_event(&mut dom, &Event::click(backdrop), now);
                }
            }
            Op::Advance { millis } => {
                now += Duration::from_millis(u64::from(millis));
                overlays.tick(&mut dom, now);
            }
        }

        let stack = overlays.stack();
        let mut ids: Vec<_> = stack.iter().map(|entry| entry.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), stack.len());
        if !stack.is_empty() {
            assert!(overlays.backdrop().is_some());
        }
    }
});
