//! Bounds-driven spacing

/// Largest `radius_a + radius_b` over neighbouring slots. `wrap` also pairs
/// the last slot with the first, as on a ring. `None` for fewer than two.
pub fn required_separation(radii: &[f32], wrap: bool) -> Option<f32> {
    if radii.len() < 2 {
        return None;
    }
    let mut widest = radii.windows(2).map(|pair| pair[0] + pair[1]).fold(0.0, f32::max);
    if wrap {
        widest = widest.max(radii[radii.len() - 1] + radii[0]);
    }
    Some(widest)
}

/// Ring radius at which neighbouring slots of a `count`-slot ring sit
/// `chord` apart.
///
/// Two slots face each other across the center, so the radius is half the
/// chord. For more, the two neighbours and the center form an isosceles
/// triangle with apex angle `360/count`; the law of sines gives the legs.
pub fn radius_for_chord(count: usize, chord: f32) -> f32 {
    match count {
        0 | 1 => 0.0,
        2 => chord / 2.0,
        n => {
            let apex = (360.0 / n as f32).to_radians();
            let base = (std::f32::consts::PI - apex) / 2.0;
            base.sin() / (apex.sin() / chord)
        }
    }
}
