use alloc::vec::Vec;
use core::fmt::Debug;
use serde::{Deserialize, Serialize};

/// Anything two cells can share to count as a match.
pub trait Token: Clone + Debug + 'static {
    fn matches(&self, other: &Self) -> bool;
}

macro_rules! impl_token_by_eq {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Token for $ty {
                fn matches(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

impl_token_by_eq!(u8, u16, u32, char, &'static str);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Palette used by the colour-pair variant.
    pub const VIBRANT: [Color; 7] = [
        Color::rgb(240, 43, 29),
        Color::rgb(34, 160, 59),
        Color::rgb(26, 115, 232),
        Color::rgb(252, 194, 0),
        Color::rgb(244, 121, 32),
        Color::rgb(111, 48, 214),
        Color::rgb(0, 191, 213),
    ];

    pub fn vibrant_pool() -> Vec<Color> {
        Self::VIBRANT.to_vec()
    }
}

impl_token_by_eq!(Color);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Icon {
    Star,
    Heart,
    Bolt,
    Leaf,
    Moon,
    Sun,
    Flame,
    Drop,
    Bell,
    Crown,
    Gift,
    Music,
}

impl Icon {
    pub const ALL: [Icon; 12] = [
        Icon::Star,
        Icon::Heart,
        Icon::Bolt,
        Icon::Leaf,
        Icon::Moon,
        Icon::Sun,
        Icon::Flame,
        Icon::Drop,
        Icon::Bell,
        Icon::Crown,
        Icon::Gift,
        Icon::Music,
    ];

    /// Symbol name the presentation layer renders.
    pub const fn symbol(self) -> &'static str {
        use Icon::*;
        match self {
            Star => "star.fill",
            Heart => "heart.fill",
            Bolt => "bolt.fill",
            Leaf => "leaf.fill",
            Moon => "moon.fill",
            Sun => "sun.max.fill",
            Flame => "flame.fill",
            Drop => "drop.fill",
            Bell => "bell.fill",
            Crown => "crown.fill",
            Gift => "gift.fill",
            Music => "music.note",
        }
    }
}

/// Index into the presentation's gradient table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GradientId(pub u8);

impl GradientId {
    pub const COUNT: u8 = 6;
}

/// Icon variant token: both the icon and its gradient must agree.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IconToken {
    pub icon: Icon,
    pub gradient: GradientId,
}

impl IconToken {
    pub const fn new(icon: Icon, gradient: GradientId) -> Self {
        Self { icon, gradient }
    }

    /// One token per icon, gradients assigned round-robin.
    pub fn pool() -> Vec<IconToken> {
        Icon::ALL
            .iter()
            .enumerate()
            .map(|(i, &icon)| IconToken::new(icon, GradientId(i as u8 % GradientId::COUNT)))
            .collect()
    }
}

impl Token for IconToken {
    fn matches(&self, other: &Self) -> bool {
        self.icon == other.icon && self.gradient == other.gradient
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_tokens_need_matching_gradient() {
        let a = IconToken::new(Icon::Star, GradientId(0));
        let b = IconToken::new(Icon::Star, GradientId(1));

        assert!(a.matches(&a));
        assert!(!a.matches(&b));
    }

    #[test]
    fn icon_pool_is_pairwise_distinct() {
        let pool = IconToken::pool();

        for (i, a) in pool.iter().enumerate() {
            for b in &pool[i + 1..] {
                assert!(!a.matches(b));
            }
        }
    }

    #[test]
    fn colors_match_by_value() {
        assert!(Color::rgb(1, 2, 3).matches(&Color::rgb(1, 2, 3)));
        assert!(!Color::VIBRANT[0].matches(&Color::VIBRANT[1]));
    }
}
