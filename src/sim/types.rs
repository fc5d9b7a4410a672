use serde::Serialize;

/// Delay applied after any action before the next one can begin, in seconds.
pub const STANDARD_ANIMATION_LOCK: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityKind {
    /// On the global cooldown; paced by the computed GCD recast.
    Gcd,
    /// Off the global cooldown; weaves between GCDs, subject to its own cooldown.
    Ogcd,
    /// Passive swing committed by the timeline itself.
    AutoAttack,
}

/// Recharge behavior for an ability that is not always ready.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CooldownSpec {
    pub duration: f64,
    pub charges: u8,
}

impl CooldownSpec {
    pub const fn single(duration: f64) -> Self {
        Self {
            duration,
            charges: 1,
        }
    }
}

/// Time-bounded status effect template. Instantiated into [BuffWindow]s by the
/// timeline when an ability applies it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Buff {
    pub name: &'static str,
    pub duration: f64,
    pub damage_multiplier: f64,
    /// When set, re-application extends the existing window instead of
    /// replacing it, capped at `now + cap`.
    pub extend_to_cap: Option<f64>,
}

/// Immutable ability template. Shared read-only across a run; gauge deltas
/// are the template's unconditioned values. Buff-conditional adjustments are
/// made per use by the decorator, never by mutating the template.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ability {
    pub id: u32,
    pub name: &'static str,
    pub kind: AbilityKind,
    pub potency: f64,
    pub cast_time: f64,
    pub animation_lock: f64,
    pub cooldown: Option<CooldownSpec>,
    pub blood_delta: Option<i32>,
    pub mp_delta: Option<i32>,
    pub applies: Option<&'static Buff>,
}

/// One realized buff application on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BuffWindow {
    pub name: &'static str,
    pub damage_multiplier: f64,
    pub start: f64,
    pub end: f64,
}

impl BuffWindow {
    /// A window is active for uses strictly after its application instant:
    /// the ability that applied it does not benefit from it.
    pub fn active_at(&self, at: f64) -> bool {
        self.start < at && at < self.end
    }
}

/// Post-mutation gauge state attached to a committed use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GaugeSnapshot {
    pub blood: i32,
    pub magic_points: i32,
}

/// Append-only log entry for one committed ability use. Immutable once the
/// run completes; the gauge/darkside annotations are filled in by the job
/// layer right after commit and never revised.
#[derive(Debug, Clone, Serialize)]
pub struct AbilityUseRecord {
    pub ability_id: u32,
    pub ability_name: &'static str,
    pub kind: AbilityKind,
    pub used_at: f64,
    pub potency: f64,
    pub damage_multiplier: f64,
    pub damage: f64,
    pub buffs: Vec<BuffWindow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gauge: Option<GaugeSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub darkside_remaining: Option<f64>,
}

/// Why a scripted step produced no timeline effect. Rejections are values,
/// not errors: the rotation driver always continues past them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOpReason {
    /// The fight is already over.
    FightOver,
    /// The gated blood spender was attempted below its cost.
    InsufficientBlood,
    /// Potion use is disabled in settings.
    PotionDisabled,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UseOutcome {
    Committed {
        used_at: f64,
        /// Index of the committed record in the timeline's log.
        record: usize,
    },
    NoOp(NoOpReason),
}

impl UseOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }
}
