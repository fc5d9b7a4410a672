use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::drk::{DrkSim, DrkSimSettings};
use crate::gear::GearSet;
use crate::parallel::WorkerPool;
use crate::solver::simulate_sets_and_return_best_parallel;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Parse(#[from] serde_json::Error),
    #[error("{0}")]
    Validation(String),
}

pub fn health_payload() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "service": "darkside-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulateRequest {
    pub gear: GearSet,
    #[serde(default)]
    pub settings: Option<DrkSimSettings>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulateResponse {
    pub status: &'static str,
    pub rotation: String,
    pub main_dps_result: f64,
    pub uses: usize,
}

pub fn simulate_payload(body: &str) -> Result<String, ApiError> {
    let request: SimulateRequest = serde_json::from_str(body)?;
    let settings = request.settings.unwrap_or_default();
    validate_settings(&settings)?;

    let sim = DrkSim::new(Some(settings));
    let result = sim.simulate(&request.gear);
    let response = SimulateResponse {
        status: "ok",
        rotation: result.rotation,
        main_dps_result: result.main_dps_result,
        uses: result.records.len(),
    };
    Ok(serde_json::to_string_pretty(&response)?)
}

#[derive(Debug, Clone, Deserialize)]
pub struct SolveRequest {
    pub sets: Vec<GearSet>,
    #[serde(default)]
    pub settings: Option<DrkSimSettings>,
    /// Worker threads for the sweep; 0 uses all cores.
    #[serde(default)]
    pub workers: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BestSetSummary {
    pub name: String,
    pub main_dps_result: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SolveResponse {
    pub status: &'static str,
    pub sets_evaluated: usize,
    /// `null` when the request carried no candidate sets.
    pub best: Option<BestSetSummary>,
}

pub fn solve_payload(body: &str) -> Result<String, ApiError> {
    let request: SolveRequest = serde_json::from_str(body)?;
    let settings = request.settings.unwrap_or_default();
    validate_settings(&settings)?;

    let sim = DrkSim::new(Some(settings));
    let pool = WorkerPool::with_workers(request.workers);
    let best = simulate_sets_and_return_best_parallel(&sim, &request.sets, &pool);
    let response = SolveResponse {
        status: "ok",
        sets_evaluated: request.sets.len(),
        best: best.map(|(dps, set)| BestSetSummary {
            name: set.name,
            main_dps_result: dps,
        }),
    };
    Ok(serde_json::to_string_pretty(&response)?)
}

fn validate_settings(settings: &DrkSimSettings) -> Result<(), ApiError> {
    if !settings.fight_time.is_finite() || settings.fight_time <= 0.0 {
        return Err(ApiError::Validation(
            "fight_time must be a positive number of seconds".to_string(),
        ));
    }
    if !settings.prepull_unmend.is_finite() || settings.prepull_unmend < 0.0 {
        return Err(ApiError::Validation(
            "prepull_unmend must be zero or more seconds".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_rejects_non_positive_fight_time() {
        let settings = DrkSimSettings {
            fight_time: 0.0,
            ..DrkSimSettings::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn validation_accepts_defaults() {
        assert!(validate_settings(&DrkSimSettings::default()).is_ok());
    }
}
