//! Static props scattered over the map.

use glam::Vec2;

use crate::SpriteKey;

/// One prop: a sprite drawn with its top-left corner at `position`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneryItem {
    /// Texture drawn for the prop.
    pub sprite: SpriteKey,
    /// Top-left corner in world units.
    pub position: Vec2,
    /// Uniform scale applied to the texture.
    pub scale: f32,
}

/// Immutable set of background props.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scenery {
    items: Vec<SceneryItem>,
}

const ROCKS: [(f32, f32); 14] = [
    (1600.0, 100.0),
    (1100.0, 30.0),
    (700.0, 120.0),
    (300.0, 60.0),
    (70.0, 400.0),
    (600.0, 600.0),
    (70.0, 900.0),
    (400.0, 850.0),
    (700.0, 500.0),
    (850.0, 680.0),
    (900.0, 1000.0),
    (1110.0, 1200.0),
    (1400.0, 600.0),
    (1600.0, 700.0),
];

const TREES: [(f32, f32); 10] = [
    (1400.0, 700.0),
    (1550.0, 60.0),
    (410.0, 12.0),
    (30.0, 635.0),
    (1080.0, 500.0),
    (700.0, 450.0),
    (900.0, 800.0),
    (475.0, 750.0),
    (820.0, 68.0),
    (1600.0, 400.0),
];

const FIRST_FLOWERS: [(f32, f32); 9] = [
    (1700.0, 900.0),
    (1750.0, 650.0),
    (1300.0, 150.0),
    (930.0, 600.0),
    (1100.0, 800.0),
    (475.0, 525.0),
    (300.0, 900.0),
    (60.0, 300.0),
    (100.0, 10.0),
];

const SECOND_FLOWERS: [(f32, f32); 2] = [(450.0, 650.0), (1000.0, 475.0)];

const THIRD_FLOWERS: [(f32, f32); 8] = [
    (300.0, 750.0),
    (650.0, 50.0),
    (750.0, 700.0),
    (1200.0, 800.0),
    (1400.0, 500.0),
    (1400.0, 50.0),
    (1100.0, 150.0),
    (150.0, 120.0),
];

impl Scenery {
    /// Creates scenery from explicit items, drawn in the given order.
    #[must_use]
    pub fn new(items: Vec<SceneryItem>) -> Self {
        Self { items }
    }

    /// Props of the classic map: rocks, then trees, then the three flower kinds.
    #[must_use]
    pub fn classic() -> Self {
        let groups: [(SpriteKey, f32, &[(f32, f32)]); 5] = [
            (SpriteKey::Rock, 2.5, &ROCKS),
            (SpriteKey::Tree, 3.0, &TREES),
            (SpriteKey::FlowerFirst, 2.0, &FIRST_FLOWERS),
            (SpriteKey::FlowerSecond, 3.0, &SECOND_FLOWERS),
            (SpriteKey::FlowerThird, 2.5, &THIRD_FLOWERS),
        ];

        let items = groups
            .into_iter()
            .flat_map(|(sprite, scale, positions)| {
                positions.iter().map(move |&(x, y)| SceneryItem {
                    sprite,
                    position: Vec2::new(x, y),
                    scale,
                })
            })
            .collect();
        Self { items }
    }

    /// Props in draw order.
    pub fn iter(&self) -> impl Iterator<Item = &SceneryItem> {
        self.items.iter()
    }

    /// Number of props.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no props.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_scenery_lists_every_prop() {
        let scenery = Scenery::classic();
        assert_eq!(scenery.len(), 14 + 10 + 9 + 2 + 8);

        let count = |key| scenery.iter().filter(|item| item.sprite == key).count();
        assert_eq!(count(SpriteKey::Rock), 14);
        assert_eq!(count(SpriteKey::Tree), 10);
        assert_eq!(count(SpriteKey::FlowerSecond), 2);
    }

    #[test]
    fn classic_scenery_keeps_per_kind_scale() {
        let scenery = Scenery::classic();
        for item in scenery.iter() {
            let expected = match item.sprite {
                SpriteKey::Rock | SpriteKey::FlowerThird => 2.5,
                SpriteKey::Tree | SpriteKey::FlowerSecond => 3.0,
                SpriteKey::FlowerFirst => 2.0,
                other => panic!("unexpected scenery sprite {other:?}"),
            };
            assert_eq!(item.scale, expected);
        }
    }
}
