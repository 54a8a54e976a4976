#![no_main]

use libfuzzer_sys::fuzz_target;
use rdn_engine::{Engine, EngineConfig, glam::Vec3};

fuzz_target!(|data: &[u8]| {
    let Some((&head, rest)) = data.split_first() else {
        return;
    };
    let floats: Vec<f32> = rest
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();

    let mut engine = Engine::with_config(EngineConfig::default().with_rng_seed(head as u64));
    engine.set_model(head as usize % 4);
    engine.set_palette((head >> 2) as usize % 3);

    let (w, h) = (4 + (head as usize % 13), 4 + (head as usize % 7));
    let mut pixels = vec![0u8; w * h * 3];
    let light = Vec3::new(
        floats.first().copied().unwrap_or(0.0),
        floats.get(1).copied().unwrap_or(0.0),
        1.0,
    );
    let _ = engine.render(w, h, light, head & 1 == 1, &mut pixels, w * 3);

    // Arbitrary floats, including NaN and infinities, must never break the grid.
    engine.set_params(&floats);
    if floats.len() >= 20 {
        engine.set_color_matrix(&floats[..20]);
    }
    for _ in 0..3 {
        engine.step();
        assert!(engine.state().is_some_and(|s| s.is_finite()));
    }
    let _ = engine.render(w, h, light, false, &mut pixels, w * 3);
});
