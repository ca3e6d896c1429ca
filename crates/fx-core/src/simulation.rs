//! Simulation Driver
//!
//! A thin layer over [`Market`]: builds the configured market, validates
//! factor input at the boundary, applies scheduled interventions and supplies
//! autopilot factors for rounds nobody scripted.

use fx_events::{FactorInputs, MarketEvent, COMMON_FACTORS};
use tracing::info;
use uuid::Uuid;

use crate::config::{Config, SimulationConfig};
use crate::error::SimulationError;
use crate::factors::{generate_factor_inputs, validate_factor_inputs};
use crate::interventions::{apply_intervention, InterventionSchedule};
use crate::market::Market;
use crate::noise::{NoiseSource, SimRng};
use crate::setup::populate_market;

/// One simulation session: a market plus the inputs that drive it.
#[derive(Debug)]
pub struct Simulation<N = SimRng> {
    run_id: Uuid,
    market: Market<N>,
    settings: SimulationConfig,
    common_factors: Vec<String>,
    schedule: InterventionSchedule,
    /// Draws autopilot factors, separate from market noise
    factor_rng: SimRng,
}

impl Simulation<SimRng> {
    /// Sets up a seeded simulation from configuration.
    pub fn new(config: &Config) -> Result<Self, SimulationError> {
        let noise = SimRng::seeded(config.simulation.seed);
        Self::with_noise(config, noise)
    }
}

impl<N: NoiseSource> Simulation<N> {
    /// Sets up a simulation whose market draws noise from `noise`.
    pub fn with_noise(config: &Config, noise: N) -> Result<Self, SimulationError> {
        config.validate()?;

        let mut market = Market::with_noise(config.market, noise);
        populate_market(&mut market, &config.currencies)?;

        let run_id = Uuid::new_v4();
        info!(
            %run_id,
            currencies = market.currencies().len(),
            seed = config.simulation.seed,
            "Simulation set up"
        );

        Ok(Self {
            run_id,
            market,
            settings: config.simulation.clone(),
            common_factors: COMMON_FACTORS.iter().map(|f| f.to_string()).collect(),
            schedule: InterventionSchedule::new(),
            factor_rng: SimRng::seeded(config.simulation.seed.wrapping_add(1)),
        })
    }

    pub fn with_interventions(mut self, schedule: InterventionSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn market(&self) -> &Market<N> {
        &self.market
    }

    pub fn market_mut(&mut self) -> &mut Market<N> {
        &mut self.market
    }

    pub fn settings(&self) -> &SimulationConfig {
        &self.settings
    }

    /// Factor names offered for every currency.
    pub fn common_factors(&self) -> &[String] {
        &self.common_factors
    }

    /// Number of interventions not yet applied.
    pub fn pending_interventions(&self) -> usize {
        self.schedule.len()
    }

    /// Runs one round.
    ///
    /// Input outside the configured factor range is rejected before anything
    /// changes. Interventions scheduled for the round are applied first, then
    /// the factors.
    pub fn run_round(&mut self, factor_inputs: &FactorInputs) -> Result<(), SimulationError> {
        validate_factor_inputs(
            factor_inputs,
            self.settings.factor_min,
            self.settings.factor_max,
        )?;

        let next_round = self.market.round() + 1;
        for intervention in self.schedule.take_due(next_round) {
            apply_intervention(&mut self.market, &intervention)?;
        }

        self.market.update_market(factor_inputs)?;
        Ok(())
    }

    /// Random factors for every currency and common factor, within the
    /// configured range.
    pub fn autopilot_inputs(&mut self) -> FactorInputs {
        let codes = self.market.codes();
        let names: Vec<&str> = self.common_factors.iter().map(String::as_str).collect();
        generate_factor_inputs(
            &codes,
            &names,
            self.settings.factor_min,
            self.settings.factor_max,
            &mut self.factor_rng,
        )
    }

    /// Scripted input for the next round, or autopilot input past the script.
    pub fn next_inputs(&mut self, script: &[FactorInputs]) -> FactorInputs {
        let index = self.market.round() as usize;
        match script.get(index) {
            Some(inputs) => inputs.clone(),
            None => self.autopilot_inputs(),
        }
    }

    /// Takes the market events recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<MarketEvent> {
        self.market.drain_events()
    }
}
