pub mod actions;
pub mod buffs;
pub mod gauge;
pub mod rotations;
pub mod sim;

pub use gauge::{DrkGauge, BLOOD_CAP, MP_CAP};
pub use rotations::{select_rotation, RotationData, FAST_GCD_BREAKPOINT};
pub use sim::{
    with_blood_weapon, DrkCycleProcessor, DrkSim, DrkSimResult, DrkSimSettings, EffectiveAbility,
    SIM_DISPLAY_NAME,
};
