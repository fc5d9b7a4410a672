pub mod cooldown;
pub mod processor;
pub mod types;

pub use cooldown::{CooldownStatus, CooldownTracker};
pub use processor::{CycleProcessor, CycleSettings, AUTO_ATTACK_ID};
pub use types::{
    Ability, AbilityKind, AbilityUseRecord, Buff, BuffWindow, CooldownSpec, GaugeSnapshot,
    NoOpReason, UseOutcome, STANDARD_ANIMATION_LOCK,
};
