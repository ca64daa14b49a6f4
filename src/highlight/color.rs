/// Linear RGBA color handed to the render service.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const YELLOW: Color = Color::rgb(1.0, 0.92, 0.016);
    pub const CYAN: Color = Color::rgb(0.0, 1.0, 1.0);
    pub const MAGENTA: Color = Color::rgb(1.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    /// Order the panel's color button steps through.
    const CYCLE: [Color; 7] = [
        Color::RED,
        Color::GREEN,
        Color::BLUE,
        Color::YELLOW,
        Color::CYAN,
        Color::MAGENTA,
        Color::WHITE,
    ];

    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Next preset in the panel cycle. Colors outside the cycle restart at red.
    pub fn next_preset(self) -> Color {
        match Self::CYCLE.iter().position(|c| *c == self) {
            Some(i) => Self::CYCLE[(i + 1) % Self::CYCLE.len()],
            None => Color::RED,
        }
    }
}

/// Rarity tier of a loose item, derived from its template identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RarityTier {
    UltraRare,
    Rare,
    Uncommon,
    Common,
}

/// Template-id prefixes per tier. Checked top to bottom, first hit wins, so
/// the longer "5c0" has to come before "5c".
const RARITY_PREFIXES: &[(&[&str], RarityTier)] = &[
    (&["5c0", "5fc"], RarityTier::UltraRare),
    (&["5c", "5a"], RarityTier::Rare),
    (&["59", "56"], RarityTier::Uncommon),
    (&["54", "57"], RarityTier::Common),
];

impl RarityTier {
    /// Look up the tier for an item template id. Unknown or empty ids are common.
    pub fn from_template_id(template_id: &str) -> Self {
        if template_id.is_empty() {
            return RarityTier::Common;
        }

        RARITY_PREFIXES
            .iter()
            .find(|(prefixes, _)| prefixes.iter().any(|p| template_id.starts_with(p)))
            .map(|(_, tier)| *tier)
            .unwrap_or(RarityTier::Common)
    }

    pub fn color(self) -> Color {
        match self {
            RarityTier::UltraRare => Color::MAGENTA,
            RarityTier::Rare => Color::YELLOW,
            RarityTier::Uncommon => Color::CYAN,
            RarityTier::Common => Color::WHITE,
        }
    }
}
