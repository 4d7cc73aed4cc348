//! Cosmetic damage tier
//!
//! Hosts map the live body count reported by the spawner onto a tier for
//! overlay effects. Nothing flows back into the simulation.

/// Damage tier, 0 (pristine) to 3 (shattered)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum DamageLevel {
    #[default]
    None,
    Cracked,
    Broken,
    Shattered,
}

impl DamageLevel {
    pub fn from_count(count: usize) -> Self {
        match count {
            0..100 => DamageLevel::None,
            100..250 => DamageLevel::Cracked,
            250..400 => DamageLevel::Broken,
            _ => DamageLevel::Shattered,
        }
    }

    /// Numeric tier, as used by overlay class names
    pub fn tier(&self) -> u8 {
        match self {
            DamageLevel::None => 0,
            DamageLevel::Cracked => 1,
            DamageLevel::Broken => 2,
            DamageLevel::Shattered => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DamageLevel::None => "none",
            DamageLevel::Cracked => "cracked",
            DamageLevel::Broken => "broken",
            DamageLevel::Shattered => "shattered",
        }
    }
}
