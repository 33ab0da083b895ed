//! Carbon-footprint aggregation over every measurement store.
//!
//! Each call reads the full current contents of all stores, folds them through
//! the emission factors and returns a summary. Nothing is cached. The reads are
//! independent queries, so a write racing with an aggregation may or may not be
//! reflected in it.

use chrono::{DateTime, Utc};
use log::debug;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::db::models::{
    Accommodation, Electricity, FoodConsumption, GoodsPurchased, Population, Transport, Waste, WaterConsumption,
    WaterTreatment,
};
use crate::services::emission_factors::EmissionFactors;
use crate::store::{Category, Record, StoreError, Stores};

const LITERS_PER_KILOLITER: f64 = 1000.0;

/// Inclusive date bounds on the records folded into a summary.
///
/// The default window is unbounded: every stored record counts, including
/// every population head-count ever recorded (a recurring daily count is
/// summed, i.e. visitor-days).
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct AggregationWindow {
    #[serde(default, deserialize_with = "query_timestamp")]
    pub from: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "query_timestamp")]
    pub to: Option<DateTime<Utc>>,
}

/// RFC 3339 from a query string. Form decoding turns an unescaped `+` offset
/// into a space, so `...T00:00:00 02:00` is read as `+02:00`.
fn query_timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    let raw = raw.trim();
    let fixed = match raw.rsplit_once(' ') {
        Some((head, offset)) if head.len() > "YYYY-MM-DD".len() && offset.len() == "hh:mm".len() => {
            format!("{}+{}", head, offset)
        }
        _ => raw.to_string(),
    };
    fixed
        .parse::<DateTime<Utc>>()
        .map(Some)
        .map_err(|e| de::Error::custom(format!("{:?} is not an RFC 3339 timestamp: {}", raw, e)))
}

impl AggregationWindow {
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.from.is_none_or(|from| ts >= from) && self.to.is_none_or(|to| ts <= to)
    }

    pub fn validate(&self) -> Result<(), String> {
        match (self.from, self.to) {
            (Some(from), Some(to)) if from > to => Err("`from` must not be later than `to`".to_string()),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Trends {
    /// Not computed yet; always empty.
    pub daily_carbon: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_carbon_footprint_co2e: f64,
    pub component_breakdown: BTreeMap<String, f64>,
    pub per_capita_footprint_co2e: f64,
    pub total_population: i64,
    pub trends: Trends,
}

#[derive(Debug, Error)]
#[error("failed to read {category} data: {source}")]
pub struct AggregationError {
    pub category: Category,
    #[source]
    pub source: StoreError,
}

pub fn summarize(
    stores: &Stores,
    factors: &EmissionFactors,
    window: &AggregationWindow,
) -> Result<DashboardSummary, AggregationError> {
    // Read everything first so a failing store yields no partial result.
    let electricity = load::<Electricity>(stores, window)?;
    let population = load::<Population>(stores, window)?;
    let transport = load::<Transport>(stores, window)?;
    let water_consumption = load::<WaterConsumption>(stores, window)?;
    let water_treatment = load::<WaterTreatment>(stores, window)?;
    let waste = load::<Waste>(stores, window)?;
    let accommodation = load::<Accommodation>(stores, window)?;
    let goods = load::<GoodsPurchased>(stores, window)?;
    let food = load::<FoodConsumption>(stores, window)?;

    let subtotals = [
        (Category::Electricity, electricity_footprint(&electricity, factors)),
        (Category::Transport, transport_footprint(&transport, factors)),
        (Category::WaterConsumption, water_consumption_footprint(&water_consumption, factors)),
        (Category::WaterTreatment, water_treatment_footprint(&water_treatment, factors)),
        (Category::Waste, waste_footprint(&waste, factors)),
        (Category::Accommodation, accommodation_footprint(&accommodation, factors)),
        (Category::GoodsPurchased, goods_footprint(&goods, factors)),
        (Category::FoodConsumption, food_footprint(&food, factors)),
    ];

    let total: f64 = subtotals.iter().map(|(_, v)| v).sum();
    let total_population = population_total(&population);
    let per_capita = if total_population > 0 {
        total / total_population as f64
    } else {
        0.0
    };

    debug!(
        "Dashboard: total={:.3} kg CO2e, population={}, per_capita={:.3}",
        total, total_population, per_capita
    );

    Ok(DashboardSummary {
        total_carbon_footprint_co2e: total,
        component_breakdown: subtotals
            .iter()
            .map(|(category, value)| (category.label().to_string(), *value))
            .collect(),
        per_capita_footprint_co2e: per_capita,
        total_population,
        trends: Trends::default(),
    })
}

fn load<R: Record>(stores: &Stores, window: &AggregationWindow) -> Result<Vec<R>, AggregationError> {
    let rows = stores.records::<R>().list().map_err(|source| AggregationError {
        category: R::CATEGORY,
        source,
    })?;
    Ok(rows.into_iter().filter(|r| window.contains(r.date())).collect())
}

fn times(quantity: Option<f64>, factor: f64) -> f64 {
    quantity.map_or(0.0, |q| q * factor)
}

/// Gross accounting: solar generation is recorded but never offsets grid use.
pub fn electricity_footprint(records: &[Electricity], f: &EmissionFactors) -> f64 {
    records
        .iter()
        .map(|r| {
            let fuel_factor = f.generator_fuel(&r.source, r.fuel_type.as_deref());
            times(r.grid_electricity_used_kwh, f.grid_electricity) + times(r.fuel_consumed_liters, fuel_factor)
        })
        .sum()
}

pub fn water_consumption_footprint(records: &[WaterConsumption], f: &EmissionFactors) -> f64 {
    let per_liter = f.factor_for(Category::WaterConsumption, "");
    records
        .iter()
        .map(|r| r.total_consumption_kld * LITERS_PER_KILOLITER * per_liter)
        .sum()
}

pub fn water_treatment_footprint(records: &[WaterTreatment], f: &EmissionFactors) -> f64 {
    records
        .iter()
        .map(|r| {
            times(r.electricity_used_kwh, f.grid_electricity)
                + times(r.chemicals_used_quantity_kg, f.treatment_chemicals)
        })
        .sum()
}

/// May be negative when recycling outweighs disposal.
pub fn waste_footprint(records: &[Waste], f: &EmissionFactors) -> f64 {
    records
        .iter()
        .map(|r| r.weight_kg * f.waste(&r.waste_type, r.sub_category.as_deref()))
        .sum()
}

pub fn transport_footprint(records: &[Transport], f: &EmissionFactors) -> f64 {
    records
        .iter()
        .map(|r| r.fuel_liters * f.factor_for(Category::Transport, &r.fuel_type))
        .sum()
}

pub fn accommodation_footprint(records: &[Accommodation], f: &EmissionFactors) -> f64 {
    records
        .iter()
        .map(|r| {
            let person_nights = f64::from(r.people_count) * f64::from(r.nights);
            times(r.electricity_consumption_kwh, f.grid_electricity)
                + times(r.water_consumption_lpd, person_nights * f.water)
        })
        .sum()
}

/// Spend-based approximation, not physical units.
pub fn goods_footprint(records: &[GoodsPurchased], f: &EmissionFactors) -> f64 {
    let per_unit = f.factor_for(Category::GoodsPurchased, "");
    records.iter().map(|r| r.bill_amount_inr * per_unit).sum()
}

pub fn food_footprint(records: &[FoodConsumption], f: &EmissionFactors) -> f64 {
    records
        .iter()
        .map(|r| {
            let fuel_factor = r
                .fuel_used_type
                .as_deref()
                .map_or(0.0, |fuel| f.factor_for(Category::FoodConsumption, fuel));
            times(r.water_used_l_washing_cooking, f.food_water) + times(r.fuel_used_quantity, fuel_factor)
        })
        .sum()
}

/// Registered plus floating counts over every record, not deduplicated by date
/// or location.
pub fn population_total(records: &[Population]) -> i64 {
    records
        .iter()
        .map(|p| i64::from(p.registered_count) + i64::from(p.floating_count))
        .sum()
}
