//! Authored move data: AttackDefinition, MoveSet, MoveLibrary.
//!
//! AttackDefinition неизменяем после загрузки и шарится через `Arc`
//! между всеми бойцами, у которых есть этот move.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::config::ConfigError;

// ============================================================================
// AttackDefinition
// ============================================================================

/// Static parameters of a single move.
///
/// All durations are in seconds. `range` is the distance from the fighter
/// origin to the hit-volume center along facing, `radius` is the hit-volume
/// (or grab query) size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackDefinition {
    pub name: String,

    pub startup: f32,
    pub active: f32,
    pub recovery: f32,

    pub damage: i32,
    pub knockback: f32,
    pub hitstun: f32,
    pub blockstun: f32,

    pub can_be_blocked: bool,
    pub is_grab: bool,

    pub range: f32,
    pub radius: f32,
}

impl Default for AttackDefinition {
    fn default() -> Self {
        Self {
            name: String::new(),
            startup: 0.08,
            active: 0.05,
            recovery: 0.12,
            damage: 5,
            knockback: 6.0,
            hitstun: 0.15,
            blockstun: 0.10,
            can_be_blocked: true,
            is_grab: false,
            range: 1.2,
            radius: 0.35,
        }
    }
}

impl AttackDefinition {
    /// Default-valued move with the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Total sequence length (startup + active + recovery); grabs skip `active`.
    pub fn total_duration(&self) -> f32 {
        if self.is_grab {
            self.startup + self.recovery
        } else {
            self.startup + self.active + self.recovery
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidMove {
            name: self.name.clone(),
            reason,
        };

        if self.name.trim().is_empty() {
            return Err(invalid("name must not be empty".to_string()));
        }

        for (field, value) in [
            ("startup", self.startup),
            ("active", self.active),
            ("recovery", self.recovery),
            ("radius", self.radius),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(format!("{} must be > 0, got {}", field, value)));
            }
        }

        for (field, value) in [
            ("knockback", self.knockback),
            ("hitstun", self.hitstun),
            ("blockstun", self.blockstun),
            ("range", self.range),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(format!("{} must be >= 0, got {}", field, value)));
            }
        }

        if self.damage < 0 {
            return Err(invalid(format!("damage must be >= 0, got {}", self.damage)));
        }

        Ok(())
    }
}

// ============================================================================
// MoveSet
// ============================================================================

/// Input slot a move is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum AttackSlot {
    /// Slot 1
    Jab,
    /// Slot 2
    Poke,
    /// Slot 3
    Heavy,
    Grab,
}

impl AttackSlot {
    /// Attack buttons in priority order (slot 1 wins over slot 2, ...).
    pub const ATTACKS: [AttackSlot; 3] = [AttackSlot::Jab, AttackSlot::Poke, AttackSlot::Heavy];

    pub fn as_str(&self) -> &'static str {
        match self {
            AttackSlot::Jab => "jab",
            AttackSlot::Poke => "poke",
            AttackSlot::Heavy => "heavy",
            AttackSlot::Grab => "grab",
        }
    }
}

impl std::fmt::Display for AttackSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-fighter move bindings. Пустой слот это ошибка конфигурации,
/// но проявляется только при попытке атаковать.
#[derive(Component, Debug, Clone, Default)]
pub struct MoveSet {
    pub jab: Option<Arc<AttackDefinition>>,
    pub poke: Option<Arc<AttackDefinition>>,
    pub heavy: Option<Arc<AttackDefinition>>,
    pub grab: Option<Arc<AttackDefinition>>,
}

impl MoveSet {
    pub fn get(&self, slot: AttackSlot) -> Option<&Arc<AttackDefinition>> {
        match slot {
            AttackSlot::Jab => self.jab.as_ref(),
            AttackSlot::Poke => self.poke.as_ref(),
            AttackSlot::Heavy => self.heavy.as_ref(),
            AttackSlot::Grab => self.grab.as_ref(),
        }
    }

    pub fn with_slot(mut self, slot: AttackSlot, attack: Arc<AttackDefinition>) -> Self {
        let target = match slot {
            AttackSlot::Jab => &mut self.jab,
            AttackSlot::Poke => &mut self.poke,
            AttackSlot::Heavy => &mut self.heavy,
            AttackSlot::Grab => &mut self.grab,
        };
        *target = Some(attack);
        self
    }

    /// Binds the moves named `jab`, `poke`, `heavy`, `grab` from the library.
    /// Names missing from the library leave the slot empty.
    pub fn from_library(library: &MoveLibrary) -> Self {
        Self {
            jab: library.get(AttackSlot::Jab.as_str()),
            poke: library.get(AttackSlot::Poke.as_str()),
            heavy: library.get(AttackSlot::Heavy.as_str()),
            grab: library.get(AttackSlot::Grab.as_str()),
        }
    }
}

// ============================================================================
// MoveLibrary
// ============================================================================

#[derive(Debug, Deserialize)]
struct MoveLibraryFile {
    #[serde(default)]
    moves: Vec<AttackDefinition>,
}

/// Named collection of validated moves (resource).
///
/// TOML format:
/// ```toml
/// [[moves]]
/// name = "jab"
/// startup = 0.08
/// damage = 5
/// ```
#[derive(Resource, Debug, Clone, Default)]
pub struct MoveLibrary {
    moves: BTreeMap<String, Arc<AttackDefinition>>,
}

impl MoveLibrary {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: MoveLibraryFile = toml::from_str(content)?;
        Self::from_definitions(file.moves)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_definitions(
        definitions: impl IntoIterator<Item = AttackDefinition>,
    ) -> Result<Self, ConfigError> {
        let mut library = Self::default();
        for definition in definitions {
            library.insert(definition)?;
        }
        Ok(library)
    }

    pub fn insert(&mut self, definition: AttackDefinition) -> Result<Arc<AttackDefinition>, ConfigError> {
        definition.validate()?;
        if self.moves.contains_key(&definition.name) {
            return Err(ConfigError::DuplicateMove(definition.name));
        }
        let shared = Arc::new(definition);
        self.moves.insert(shared.name.clone(), shared.clone());
        Ok(shared)
    }

    pub fn get(&self, name: &str) -> Option<Arc<AttackDefinition>> {
        self.moves.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.moves.keys().map(String::as_str)
    }

    /// Built-in moves bound to the default slots.
    pub fn builtin() -> Self {
        let jab = AttackDefinition::named("jab");

        let poke = AttackDefinition {
            name: "poke".to_string(),
            startup: 0.12,
            active: 0.06,
            recovery: 0.18,
            damage: 7,
            knockback: 5.0,
            hitstun: 0.2,
            blockstun: 0.12,
            range: 1.6,
            radius: 0.3,
            ..Default::default()
        };

        // Heavy пробивает блок
        let heavy = AttackDefinition {
            name: "heavy".to_string(),
            startup: 0.25,
            active: 0.08,
            recovery: 0.35,
            damage: 14,
            knockback: 9.0,
            hitstun: 0.35,
            blockstun: 0.2,
            can_be_blocked: false,
            range: 1.3,
            radius: 0.45,
            ..Default::default()
        };

        let grab = AttackDefinition {
            name: "grab".to_string(),
            startup: 0.1,
            recovery: 0.3,
            damage: 10,
            knockback: 4.0,
            hitstun: 0.5,
            blockstun: 0.0,
            can_be_blocked: false,
            is_grab: true,
            range: 0.9,
            radius: 0.5,
            ..Default::default()
        };

        let mut library = Self::default();
        for definition in [jab, poke, heavy, grab] {
            let name = definition.name.clone();
            library.moves.insert(name, Arc::new(definition));
        }
        library
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_definition_matches_authored_defaults() {
        let jab = AttackDefinition::named("jab");
        assert_eq!(jab.startup, 0.08);
        assert_eq!(jab.active, 0.05);
        assert_eq!(jab.recovery, 0.12);
        assert_eq!(jab.damage, 5);
        assert_eq!(jab.knockback, 6.0);
        assert!(jab.can_be_blocked);
        assert!(!jab.is_grab);
        assert!(jab.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero_startup = AttackDefinition {
            startup: 0.0,
            ..AttackDefinition::named("broken")
        };
        assert!(matches!(zero_startup.validate(), Err(ConfigError::InvalidMove { .. })));

        let negative_damage = AttackDefinition {
            damage: -1,
            ..AttackDefinition::named("broken")
        };
        assert!(negative_damage.validate().is_err());

        let nan_knockback = AttackDefinition {
            knockback: f32::NAN,
            ..AttackDefinition::named("broken")
        };
        assert!(nan_knockback.validate().is_err());

        assert!(AttackDefinition::default().validate().is_err(), "empty name");
    }

    #[test]
    fn test_library_from_toml() {
        let toml = r#"
            [[moves]]
            name = "jab"

            [[moves]]
            name = "throw"
            is_grab = true
            damage = 12
            radius = 0.6
        "#;

        let library = MoveLibrary::from_toml_str(toml).expect("valid library");
        assert_eq!(library.len(), 2);

        let throw = library.get("throw").expect("throw loaded");
        assert!(throw.is_grab);
        assert_eq!(throw.damage, 12);
        assert_eq!(throw.range, 1.2, "unspecified fields keep defaults");
    }

    #[test]
    fn test_library_rejects_duplicates_and_invalid() {
        let duplicate = "[[moves]]\nname = \"jab\"\n[[moves]]\nname = \"jab\"\n";
        assert!(matches!(
            MoveLibrary::from_toml_str(duplicate),
            Err(ConfigError::DuplicateMove(name)) if name == "jab"
        ));

        let invalid = "[[moves]]\nname = \"jab\"\nradius = 0.0\n";
        assert!(matches!(
            MoveLibrary::from_toml_str(invalid),
            Err(ConfigError::InvalidMove { .. })
        ));
    }

    #[test]
    fn test_builtin_library_fills_every_slot() {
        let library = MoveLibrary::builtin();
        let moves = MoveSet::from_library(&library);

        for slot in AttackSlot::ATTACKS {
            let attack = moves.get(slot).expect("attack slot bound");
            assert!(!attack.is_grab);
            assert!(attack.validate().is_ok());
        }
        let grab = moves.get(AttackSlot::Grab).expect("grab slot bound");
        assert!(grab.is_grab);

        // Один и тот же Arc, не копия
        let again = library.get("jab").expect("jab");
        assert!(Arc::ptr_eq(moves.jab.as_ref().expect("jab"), &again));
    }

    #[test]
    fn test_move_set_missing_slot() {
        let moves = MoveSet::default().with_slot(AttackSlot::Jab, Arc::new(AttackDefinition::named("jab")));
        assert!(moves.get(AttackSlot::Jab).is_some());
        assert!(moves.get(AttackSlot::Heavy).is_none());
    }
}
