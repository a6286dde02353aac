//! Item catalog and the effect dispatch applied when an item is used.

use rand::Rng;

use crate::PixelPosition;

/// Dense identifier of an item lying on the map.
///
/// The identifier always equals the item's index in the map's item list and
/// is reassigned whenever an earlier item is removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(u32);

impl ItemId {
    /// Creates a new item identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Identifier matching the provided list index.
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).unwrap_or(u32::MAX))
    }
}

/// Kinds of items that can be found lying around.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// Restores hit points.
    Potion,
    /// Cures poison.
    Antidote,
    /// Melee weapon with a small random damage bonus.
    ShortSword,
}

impl ItemKind {
    /// Every kind the spawner may choose from.
    pub const CATALOG: [ItemKind; 3] = [Self::Potion, Self::Antidote, Self::ShortSword];

    /// Display name shown to the player.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Potion => "Potion",
            Self::Antidote => "Antidote",
            Self::ShortSword => "Short Sword",
        }
    }

    /// Prices used when buying or selling the item.
    #[must_use]
    pub const fn value(self) -> TradeValue {
        match self {
            Self::Potion => TradeValue::new(30, 15),
            Self::Antidote => TradeValue::new(10, 5),
            Self::ShortSword => TradeValue::new(120, 60),
        }
    }

    /// Situations in which the item may be used.
    #[must_use]
    pub const fn contexts(self) -> &'static [UseContext] {
        match self {
            Self::Potion | Self::Antidote => &[UseContext::Field, UseContext::Battle],
            Self::ShortSword => &[UseContext::Battle],
        }
    }

    /// Classes of entity the item may target.
    #[must_use]
    pub const fn targets(self) -> &'static [TargetClass] {
        match self {
            Self::Potion | Self::Antidote => &[TargetClass::Ally],
            Self::ShortSword => &[TargetClass::Enemy],
        }
    }

    /// Effect applied to the target when the item is used.
    #[must_use]
    pub const fn effect(self) -> ItemEffect {
        match self {
            Self::Potion => ItemEffect::Heal { amount: 20 },
            Self::Antidote => ItemEffect::Cure,
            Self::ShortSword => ItemEffect::Damage { base: 4, bonus: 3 },
        }
    }

    /// Reports whether using the item uses it up.
    #[must_use]
    pub const fn is_consumable(self) -> bool {
        matches!(self, Self::Potion | Self::Antidote)
    }

    /// Reports whether the item may be used in the context on the target class.
    #[must_use]
    pub fn usable(self, context: UseContext, target: TargetClass) -> bool {
        self.contexts().contains(&context) && self.targets().contains(&target)
    }
}

/// Buy and sell prices of an item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TradeValue {
    /// Price paid when buying the item.
    pub buy: u32,
    /// Price received when selling the item.
    pub sell: u32,
}

impl TradeValue {
    /// Creates a new pair of trade values.
    #[must_use]
    pub const fn new(buy: u32, sell: u32) -> Self {
        Self { buy, sell }
    }
}

/// Situation in which an item is used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UseContext {
    /// While exploring.
    Field,
    /// During a battle.
    Battle,
}

/// Class of entity an item may target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetClass {
    /// The player or a party member.
    Ally,
    /// A hostile entity.
    Enemy,
}

/// Effect carried by an item as data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemEffect {
    /// Restores up to `amount` hit points without exceeding the maximum.
    Heal {
        /// Hit points restored.
        amount: u32,
    },
    /// Removes poison.
    Cure,
    /// Deals `base` damage plus a uniform bonus in `0..=bonus`.
    Damage {
        /// Fixed damage.
        base: u32,
        /// Upper bound of the random bonus.
        bonus: u32,
    },
}

impl ItemEffect {
    /// Applies the effect to the target.
    pub fn apply<R: Rng + ?Sized>(self, target: &mut Vitals, rng: &mut R) -> EffectOutcome {
        match self {
            Self::Heal { amount } => {
                let before = target.hp;
                target.hp = target.hp.saturating_add(amount).min(target.max_hp);
                EffectOutcome::Healed {
                    amount: target.hp - before,
                }
            }
            Self::Cure => {
                let was_poisoned = target.poisoned;
                target.poisoned = false;
                EffectOutcome::Cured { was_poisoned }
            }
            Self::Damage { base, bonus } => {
                let amount = base.saturating_add(rng.gen_range(0..=bonus));
                target.hp = target.hp.saturating_sub(amount);
                EffectOutcome::Damaged { amount }
            }
        }
    }
}

/// Observable result of applying an [`ItemEffect`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectOutcome {
    /// Hit points actually restored.
    Healed {
        /// Restored amount after clamping to the maximum.
        amount: u32,
    },
    /// Poison was removed.
    Cured {
        /// Whether the target had been poisoned.
        was_poisoned: bool,
    },
    /// Damage was dealt.
    Damaged {
        /// Damage dealt including the random bonus.
        amount: u32,
    },
}

/// Health state of an entity that items can target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Vitals {
    /// Current hit points.
    pub hp: u32,
    /// Maximum hit points.
    pub max_hp: u32,
    /// Whether the entity is poisoned.
    pub poisoned: bool,
}

impl Vitals {
    /// Creates healthy vitals with the provided maximum.
    #[must_use]
    pub const fn full(max_hp: u32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            poisoned: false,
        }
    }
}

/// Item lying on the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ItemInstance {
    /// Dense identifier equal to the item's index in the map's item list.
    pub id: ItemId,
    /// Grid-aligned pixel position of the item.
    pub position: PixelPosition,
    /// Kind of item.
    pub kind: ItemKind,
}

impl ItemInstance {
    /// Strips the map-specific fields, leaving an inventory record.
    #[must_use]
    pub const fn into_record(self) -> ItemRecord {
        ItemRecord { kind: self.kind }
    }
}

/// Item held in the inventory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ItemRecord {
    /// Kind of item.
    pub kind: ItemKind,
}
