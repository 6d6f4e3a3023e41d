//! Built-in planet table.

use crate::systems::orbit::BodyDesc;

/// Index of Earth in [`default_bodies`].
pub const EARTH: usize = 2;

/// (name, color, radius scale, distance, speed)
const PLANETS: [(&str, &str, f32, f32, f32); 8] = [
    ("Mercury", "#A5A5A5", 0.8, 35.0, 0.015),
    ("Venus", "#E3BB76", 1.1, 50.0, 0.012),
    ("Earth", "#2E86C1", 1.2, 70.0, 0.01),
    ("Mars", "#C0392B", 0.9, 90.0, 0.008),
    ("Jupiter", "#D4AC6E", 2.5, 130.0, 0.005),
    ("Saturn", "#F4D03F", 2.2, 170.0, 0.004),
    ("Uranus", "#73C6B6", 1.8, 210.0, 0.003),
    ("Neptune", "#5DADE2", 1.8, 250.0, 0.002),
];

/// The eight planets, innermost first.
pub fn default_bodies() -> Vec<BodyDesc> {
    PLANETS
        .iter()
        .map(|&(name, color, radius_scale, distance, speed)| BodyDesc {
            name: name.to_string(),
            color: color.to_string(),
            radius_scale,
            distance,
            speed,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::effects::rgb_from_hex;

    #[test]
    fn catalog_is_ordered_and_valid() {
        let bodies = default_bodies();
        assert_eq!(bodies.len(), 8);
        assert_eq!(bodies[EARTH].name, "Earth");
        for pair in bodies.windows(2) {
            assert!(pair[0].distance < pair[1].distance);
            assert!(pair[0].speed > pair[1].speed);
        }
        assert!(bodies.iter().all(|b| rgb_from_hex(&b.color).is_some()));
    }
}
