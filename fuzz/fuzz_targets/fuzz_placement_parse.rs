#![no_main]

use libfuzzer_sys::fuzz_target;
use tether_popper::Placement;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(placement) = input.parse::<Placement>() {
        // Canonical form must parse back to the same value.
        let rendered = placement.to_string();
        assert_eq!(rendered.parse::<Placement>().ok(), Some(placement));
    }
    let _ = Placement::parse_lenient(input);
});
