//! Emission factors (kg CO2e per physical unit).
//!
//! Placeholder values: they stand in for region-specific published factors and
//! are only meant to make the relative weight of each category visible.
//!
//! Lookups never fail. A discriminator the table does not know contributes a
//! factor of zero so that free-text input cannot break aggregation.

use crate::db::models::ElectricitySource;
use crate::store::Category;
use crate::utils::discriminator_key;

#[derive(Debug, Clone, PartialEq)]
pub struct EmissionFactors {
    /// Grid electricity, per kWh.
    pub grid_electricity: f64,
    /// Per liter.
    pub diesel: f64,
    /// Per liter; also used for gasoline.
    pub petrol: f64,
    /// Per liter.
    pub biofuel: f64,
    /// Per kg.
    pub lpg: f64,
    /// Per kg.
    pub firewood: f64,
    /// Treatment and distribution, per liter.
    pub water: f64,
    /// Washing and cooking water, per liter.
    pub food_water: f64,
    /// Water treatment chemicals, per kg.
    pub treatment_chemicals: f64,
    pub waste_biodegradable: f64,
    /// Negative: recycling offsets emissions.
    pub waste_recyclable: f64,
    pub waste_landfill: f64,
    pub waste_e_waste: f64,
    /// Spend-based proxy, per currency unit.
    pub goods_spend: f64,
}

impl Default for EmissionFactors {
    fn default() -> Self {
        EmissionFactors {
            grid_electricity: 0.45,
            diesel: 2.68,
            petrol: 2.31,
            biofuel: 0.5,
            lpg: 2.98,
            firewood: 0.06,
            water: 0.00034,
            food_water: 0.00034,
            treatment_chemicals: 1.0,
            waste_biodegradable: 0.1,
            waste_recyclable: -0.1,
            waste_landfill: 0.5,
            waste_e_waste: 1.5,
            goods_spend: 0.0004,
        }
    }
}

impl EmissionFactors {
    /// Factor for a category and its sub-type label. Unmapped pairs yield 0.
    ///
    /// The discriminator is the electricity source, the fuel type (transport,
    /// food, generator fuel) or the waste type. Waste sub-categories go through
    /// [`EmissionFactors::waste`]. Categories with a single flat factor ignore
    /// the discriminator.
    pub fn factor_for(&self, category: Category, discriminator: &str) -> f64 {
        match category {
            Category::Electricity => self.electricity_source(discriminator),
            Category::Transport => self.fuel(discriminator),
            Category::FoodConsumption => self.cooking_fuel(discriminator),
            Category::Waste => self.waste(discriminator, None),
            Category::WaterConsumption => self.water,
            Category::WaterTreatment => self.treatment_chemicals,
            Category::GoodsPurchased => self.goods_spend,
            Category::Accommodation => self.grid_electricity,
            Category::Population => 0.0,
        }
    }

    /// Per-kWh factor of the energy drawn from a source. Generators are costed
    /// through their fuel, solar is excluded.
    pub fn electricity_source(&self, source: &str) -> f64 {
        match ElectricitySource::parse(source) {
            Some(ElectricitySource::MainBoard) => self.grid_electricity,
            _ => 0.0,
        }
    }

    /// Per-liter factor of the fuel burnt by a generator of `source`, preferring
    /// an explicit `fuel_type` when one was recorded.
    pub fn generator_fuel(&self, source: &str, fuel_type: Option<&str>) -> f64 {
        if let Some(fuel) = fuel_type {
            return self.fuel(fuel);
        }
        match ElectricitySource::parse(source) {
            Some(ElectricitySource::DieselGenerator) => self.diesel,
            Some(ElectricitySource::BiofuelGenerator) => self.biofuel,
            _ => 0.0,
        }
    }

    /// Liquid vehicle / generator fuels, per liter.
    pub fn fuel(&self, fuel_type: &str) -> f64 {
        match discriminator_key(fuel_type).as_str() {
            "diesel" => self.diesel,
            "petrol" | "gasoline" => self.petrol,
            "biofuel" | "biodiesel" => self.biofuel,
            _ => 0.0,
        }
    }

    /// Kitchen fuels: LPG and firewood per kg, electricity per kWh.
    pub fn cooking_fuel(&self, fuel_type: &str) -> f64 {
        match discriminator_key(fuel_type).as_str() {
            "lpg" => self.lpg,
            "firewood" | "wood" => self.firewood,
            "electricity" | "electric" => self.grid_electricity,
            _ => 0.0,
        }
    }

    /// Non-biodegradable waste goes to landfill unless it is e-waste.
    pub fn waste(&self, waste_type: &str, sub_category: Option<&str>) -> f64 {
        let is_e_waste = sub_category
            .map(|s| matches!(discriminator_key(s).as_str(), "e-waste" | "ewaste" | "e waste"))
            .unwrap_or(false);

        match discriminator_key(waste_type).as_str() {
            "biodegradable" => self.waste_biodegradable,
            "recyclable" => self.waste_recyclable,
            "landfill" => self.waste_landfill,
            "non-biodegradable" | "non biodegradable" => {
                if is_e_waste {
                    self.waste_e_waste
                } else {
                    self.waste_landfill
                }
            }
            "e-waste" | "ewaste" => self.waste_e_waste,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmapped_discriminators_are_zero() {
        let f = EmissionFactors::default();
        assert_eq!(f.factor_for(Category::Transport, "hydrogen"), 0.0);
        assert_eq!(f.factor_for(Category::FoodConsumption, "coal"), 0.0);
        assert_eq!(f.factor_for(Category::Waste, "mystery"), 0.0);
        assert_eq!(f.factor_for(Category::Electricity, "windmill"), 0.0);
        assert_eq!(f.factor_for(Category::Population, "anything"), 0.0);
    }

    #[test]
    fn lookups_ignore_case_and_spacing() {
        let f = EmissionFactors::default();
        assert_eq!(f.fuel(" DIESEL "), f.diesel);
        assert_eq!(f.fuel("Gasoline"), f.petrol);
        assert_eq!(f.cooking_fuel("lpg"), f.lpg);
        assert_eq!(f.factor_for(Category::Electricity, "main  board"), f.grid_electricity);
    }

    #[test]
    fn solar_and_generators_are_not_grid() {
        let f = EmissionFactors::default();
        assert_eq!(f.electricity_source("Solar Generation"), 0.0);
        assert_eq!(f.electricity_source("Diesel Generator"), 0.0);
    }

    #[test]
    fn generator_fuel_prefers_recorded_fuel_type() {
        let f = EmissionFactors::default();
        assert_eq!(f.generator_fuel("Diesel Generator", None), f.diesel);
        assert_eq!(f.generator_fuel("Biofuel Generator", None), f.biofuel);
        assert_eq!(f.generator_fuel("Diesel Generator", Some("Biofuel")), f.biofuel);
        assert_eq!(f.generator_fuel("Main Board", None), 0.0);
    }

    #[test]
    fn recyclable_is_an_offset() {
        let f = EmissionFactors::default();
        assert!(f.waste("Recyclable", None) < 0.0);
    }

    #[test]
    fn non_biodegradable_defaults_to_landfill_unless_e_waste() {
        let f = EmissionFactors::default();
        assert_eq!(f.waste("Non-Biodegradable", Some("Plastic")), f.waste_landfill);
        assert_eq!(f.waste("Non-Biodegradable", None), f.waste_landfill);
        assert_eq!(f.waste("Non-Biodegradable", Some("E-waste")), f.waste_e_waste);
    }

    #[test]
    fn cooking_on_electricity_uses_grid_factor() {
        let f = EmissionFactors::default();
        assert_eq!(f.cooking_fuel("Electricity"), f.grid_electricity);
    }
}
