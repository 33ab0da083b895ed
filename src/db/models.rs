//! Diesel model structs for the measurement tables and users.
//!
//! Each measurement category has a queryable row (`Electricity`, ...) and a
//! write shape (`NewElectricity`, ...) that doubles as the full-row changeset
//! used by updates. Optional columns map to `Option<T>`; `None` is stored as
//! NULL and never counts as zero.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema;
use crate::store::{Category, Record, RecordStore, Stores};
use crate::utils::{
    default_location, discriminator_key, location_or_default, normalize_location, optional_non_negative,
    require_non_negative, require_text,
};

/// The fixed set of electricity sources.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ElectricitySource {
    MainBoard,
    DieselGenerator,
    BiofuelGenerator,
    SolarGeneration,
}

impl ElectricitySource {
    pub const ALL: [ElectricitySource; 4] = [
        ElectricitySource::MainBoard,
        ElectricitySource::DieselGenerator,
        ElectricitySource::BiofuelGenerator,
        ElectricitySource::SolarGeneration,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        match discriminator_key(raw).as_str() {
            "main board" | "mainboard" | "grid" => Some(ElectricitySource::MainBoard),
            "diesel generator" | "generator" | "dg" => Some(ElectricitySource::DieselGenerator),
            "biofuel generator" => Some(ElectricitySource::BiofuelGenerator),
            "solar generation" | "solar" => Some(ElectricitySource::SolarGeneration),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ElectricitySource::MainBoard => "Main Board",
            ElectricitySource::DieselGenerator => "Diesel Generator",
            ElectricitySource::BiofuelGenerator => "Biofuel Generator",
            ElectricitySource::SolarGeneration => "Solar Generation",
        }
    }
}

// =====================
// Electricity
// =====================

#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = schema::electric_consumption)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Electricity {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub location: String,
    pub source: String,
    pub dg_capacity_kva: Option<f64>,
    pub running_time_hours: Option<f64>,
    pub fuel_consumed_liters: Option<f64>,
    pub fuel_type: Option<String>,
    pub energy_generated_dg_kwh: Option<f64>,
    pub grid_electricity_used_kwh: Option<f64>,
    pub electricity_bill_kwh: Option<f64>,
    pub electricity_bill_cost_inr: Option<f64>,
    pub electrical_appliances_count: Option<i32>,
    pub solar_generated_kwh: Option<f64>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Insertable, AsChangeset, Serialize, Deserialize)]
#[diesel(table_name = schema::electric_consumption)]
#[diesel(treat_none_as_null = true)]
#[serde(deny_unknown_fields)]
pub struct NewElectricity {
    #[serde(default = "Utc::now")]
    pub date: DateTime<Utc>,
    #[serde(default = "default_location", deserialize_with = "location_or_default")]
    pub location: String,
    pub source: String,
    pub dg_capacity_kva: Option<f64>,
    pub running_time_hours: Option<f64>,
    pub fuel_consumed_liters: Option<f64>,
    pub fuel_type: Option<String>,
    pub energy_generated_dg_kwh: Option<f64>,
    pub grid_electricity_used_kwh: Option<f64>,
    pub electricity_bill_kwh: Option<f64>,
    pub electricity_bill_cost_inr: Option<f64>,
    pub electrical_appliances_count: Option<i32>,
    pub solar_generated_kwh: Option<f64>,
    pub remarks: Option<String>,
}

impl Record for Electricity {
    type New = NewElectricity;
    const CATEGORY: Category = Category::Electricity;

    fn id(&self) -> i64 {
        self.id
    }

    fn date(&self) -> DateTime<Utc> {
        self.date
    }

    fn prepare(new: &mut NewElectricity) -> Result<(), String> {
        normalize_location(&mut new.location);
        let source = ElectricitySource::parse(&new.source).ok_or_else(|| {
            let allowed = ElectricitySource::ALL.map(|s| s.as_str()).join(", ");
            format!("source must be one of: {}", allowed)
        })?;
        new.source = source.as_str().to_string();
        optional_non_negative("fuel_consumed_liters", new.fuel_consumed_liters)?;
        optional_non_negative("grid_electricity_used_kwh", new.grid_electricity_used_kwh)?;
        optional_non_negative("solar_generated_kwh", new.solar_generated_kwh)
    }

    fn store(stores: &Stores) -> &dyn RecordStore<Self> {
        &*stores.electricity
    }
}

// =====================
// Water consumption
// =====================

#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = schema::water_consumption)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WaterConsumption {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub location: String,
    pub water_source: Option<String>,
    pub cumulative_meter_reading: Option<f64>,
    /// Kiloliters per day.
    pub total_consumption_kld: f64,
    pub per_capita_consumption_lpd: Option<f64>,
    pub usage_type: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Insertable, AsChangeset, Serialize, Deserialize)]
#[diesel(table_name = schema::water_consumption)]
#[diesel(treat_none_as_null = true)]
#[serde(deny_unknown_fields)]
pub struct NewWaterConsumption {
    #[serde(default = "Utc::now")]
    pub date: DateTime<Utc>,
    #[serde(default = "default_location", deserialize_with = "location_or_default")]
    pub location: String,
    pub water_source: Option<String>,
    pub cumulative_meter_reading: Option<f64>,
    pub total_consumption_kld: f64,
    pub per_capita_consumption_lpd: Option<f64>,
    pub usage_type: Option<String>,
    pub remarks: Option<String>,
}

impl Record for WaterConsumption {
    type New = NewWaterConsumption;
    const CATEGORY: Category = Category::WaterConsumption;

    fn id(&self) -> i64 {
        self.id
    }

    fn date(&self) -> DateTime<Utc> {
        self.date
    }

    fn prepare(new: &mut NewWaterConsumption) -> Result<(), String> {
        normalize_location(&mut new.location);
        require_non_negative("total_consumption_kld", new.total_consumption_kld)
    }

    fn store(stores: &Stores) -> &dyn RecordStore<Self> {
        &*stores.water_consumption
    }
}

// =====================
// Water treatment
// =====================

#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = schema::water_treatment)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WaterTreatment {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub location: String,
    pub treated_liters_per_day: Option<f64>,
    pub ultra_filtration_liters_per_day: Option<f64>,
    pub percentage_water_reused: Option<f64>,
    pub electricity_used_kwh: Option<f64>,
    pub chemicals_used_description: Option<String>,
    pub chemicals_used_quantity_kg: Option<f64>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Insertable, AsChangeset, Serialize, Deserialize)]
#[diesel(table_name = schema::water_treatment)]
#[diesel(treat_none_as_null = true)]
#[serde(deny_unknown_fields)]
pub struct NewWaterTreatment {
    #[serde(default = "Utc::now")]
    pub date: DateTime<Utc>,
    #[serde(default = "default_location", deserialize_with = "location_or_default")]
    pub location: String,
    pub treated_liters_per_day: Option<f64>,
    pub ultra_filtration_liters_per_day: Option<f64>,
    pub percentage_water_reused: Option<f64>,
    pub electricity_used_kwh: Option<f64>,
    pub chemicals_used_description: Option<String>,
    pub chemicals_used_quantity_kg: Option<f64>,
    pub remarks: Option<String>,
}

impl Record for WaterTreatment {
    type New = NewWaterTreatment;
    const CATEGORY: Category = Category::WaterTreatment;

    fn id(&self) -> i64 {
        self.id
    }

    fn date(&self) -> DateTime<Utc> {
        self.date
    }

    fn prepare(new: &mut NewWaterTreatment) -> Result<(), String> {
        normalize_location(&mut new.location);
        if let Some(pct) = new.percentage_water_reused
            && !(0.0..=100.0).contains(&pct)
        {
            return Err("percentage_water_reused must be between 0 and 100".to_string());
        }
        optional_non_negative("electricity_used_kwh", new.electricity_used_kwh)?;
        optional_non_negative("chemicals_used_quantity_kg", new.chemicals_used_quantity_kg)
    }

    fn store(stores: &Stores) -> &dyn RecordStore<Self> {
        &*stores.water_treatment
    }
}

// =====================
// Waste
// =====================

#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = schema::waste)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Waste {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub location: String,
    /// Biodegradable, Non-Biodegradable, Recyclable or Landfill.
    pub waste_type: String,
    /// Food, Garden, Plastic, Paper, Glass, Metal, E-waste, ...
    pub sub_category: Option<String>,
    pub weight_kg: f64,
    pub collection_method: Option<String>,
    pub transport_mode: Option<String>,
    pub destination: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Insertable, AsChangeset, Serialize, Deserialize)]
#[diesel(table_name = schema::waste)]
#[diesel(treat_none_as_null = true)]
#[serde(deny_unknown_fields)]
pub struct NewWaste {
    #[serde(default = "Utc::now")]
    pub date: DateTime<Utc>,
    #[serde(default = "default_location", deserialize_with = "location_or_default")]
    pub location: String,
    pub waste_type: String,
    pub sub_category: Option<String>,
    pub weight_kg: f64,
    pub collection_method: Option<String>,
    pub transport_mode: Option<String>,
    pub destination: Option<String>,
    pub remarks: Option<String>,
}

impl Record for Waste {
    type New = NewWaste;
    const CATEGORY: Category = Category::Waste;

    fn id(&self) -> i64 {
        self.id
    }

    fn date(&self) -> DateTime<Utc> {
        self.date
    }

    fn prepare(new: &mut NewWaste) -> Result<(), String> {
        normalize_location(&mut new.location);
        require_text("waste_type", &new.waste_type)?;
        require_non_negative("weight_kg", new.weight_kg)
    }

    fn store(stores: &Stores) -> &dyn RecordStore<Self> {
        &*stores.waste
    }
}

// =====================
// Transport
// =====================

#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = schema::transport)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Transport {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub location: String,
    pub vehicle_type: String,
    pub fuel_type: String,
    pub vehicle_number: Option<String>,
    pub start_location: Option<String>,
    pub end_location: Option<String>,
    pub distance_km: f64,
    pub fuel_liters: f64,
    pub people_travelled_count: Option<i32>,
    pub fuel_efficiency_km_per_liter: Option<f64>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Insertable, AsChangeset, Serialize, Deserialize)]
#[diesel(table_name = schema::transport)]
#[diesel(treat_none_as_null = true)]
#[serde(deny_unknown_fields)]
pub struct NewTransport {
    #[serde(default = "Utc::now")]
    pub date: DateTime<Utc>,
    #[serde(default = "default_location", deserialize_with = "location_or_default")]
    pub location: String,
    pub vehicle_type: String,
    pub fuel_type: String,
    pub vehicle_number: Option<String>,
    pub start_location: Option<String>,
    pub end_location: Option<String>,
    pub distance_km: f64,
    pub fuel_liters: f64,
    pub people_travelled_count: Option<i32>,
    pub fuel_efficiency_km_per_liter: Option<f64>,
    pub remarks: Option<String>,
}

impl Record for Transport {
    type New = NewTransport;
    const CATEGORY: Category = Category::Transport;

    fn id(&self) -> i64 {
        self.id
    }

    fn date(&self) -> DateTime<Utc> {
        self.date
    }

    fn prepare(new: &mut NewTransport) -> Result<(), String> {
        normalize_location(&mut new.location);
        require_text("vehicle_type", &new.vehicle_type)?;
        require_text("fuel_type", &new.fuel_type)?;
        require_non_negative("distance_km", new.distance_km)?;
        require_non_negative("fuel_liters", new.fuel_liters)
    }

    fn store(stores: &Stores) -> &dyn RecordStore<Self> {
        &*stores.transport
    }
}

// =====================
// Accommodation
// =====================

#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = schema::accommodation)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Accommodation {
    pub id: i64,
    pub date: DateTime<Utc>,
    /// Facility name.
    pub location: String,
    pub participant_guest_name: Option<String>,
    pub category: Option<String>,
    pub people_count: i32,
    pub accommodation_type: Option<String>,
    pub room_type: Option<String>,
    pub no_of_rooms: Option<i32>,
    pub nights: i32,
    pub electricity_consumption_kwh: Option<f64>,
    /// Liters per person per day.
    pub water_consumption_lpd: Option<f64>,
    pub meals_provided: Option<bool>,
    pub transport_mode_to_venue: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Insertable, AsChangeset, Serialize, Deserialize)]
#[diesel(table_name = schema::accommodation)]
#[diesel(treat_none_as_null = true)]
#[serde(deny_unknown_fields)]
pub struct NewAccommodation {
    #[serde(default = "Utc::now")]
    pub date: DateTime<Utc>,
    #[serde(default = "default_location", deserialize_with = "location_or_default")]
    pub location: String,
    pub participant_guest_name: Option<String>,
    pub category: Option<String>,
    pub people_count: i32,
    pub accommodation_type: Option<String>,
    pub room_type: Option<String>,
    pub no_of_rooms: Option<i32>,
    pub nights: i32,
    pub electricity_consumption_kwh: Option<f64>,
    pub water_consumption_lpd: Option<f64>,
    pub meals_provided: Option<bool>,
    pub transport_mode_to_venue: Option<String>,
    pub remarks: Option<String>,
}

impl Record for Accommodation {
    type New = NewAccommodation;
    const CATEGORY: Category = Category::Accommodation;

    fn id(&self) -> i64 {
        self.id
    }

    fn date(&self) -> DateTime<Utc> {
        self.date
    }

    fn prepare(new: &mut NewAccommodation) -> Result<(), String> {
        normalize_location(&mut new.location);
        if new.people_count < 0 {
            return Err("people_count must not be negative".to_string());
        }
        if new.nights < 0 {
            return Err("nights must not be negative".to_string());
        }
        optional_non_negative("electricity_consumption_kwh", new.electricity_consumption_kwh)?;
        optional_non_negative("water_consumption_lpd", new.water_consumption_lpd)
    }

    fn store(stores: &Stores) -> &dyn RecordStore<Self> {
        &*stores.accommodation
    }
}

// =====================
// Food consumption
// =====================

#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = schema::food_consumption)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FoodConsumption {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub location: String,
    pub food_item: String,
    pub quantity_cooked_kg_liter: f64,
    pub no_of_meals_served: Option<i32>,
    pub raw_material_source: Option<String>,
    pub water_used_l_washing_cooking: Option<f64>,
    /// LPG, Firewood or Electricity.
    pub fuel_used_type: Option<String>,
    pub fuel_used_quantity: Option<f64>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Insertable, AsChangeset, Serialize, Deserialize)]
#[diesel(table_name = schema::food_consumption)]
#[diesel(treat_none_as_null = true)]
#[serde(deny_unknown_fields)]
pub struct NewFoodConsumption {
    #[serde(default = "Utc::now")]
    pub date: DateTime<Utc>,
    #[serde(default = "default_location", deserialize_with = "location_or_default")]
    pub location: String,
    pub food_item: String,
    pub quantity_cooked_kg_liter: f64,
    pub no_of_meals_served: Option<i32>,
    pub raw_material_source: Option<String>,
    pub water_used_l_washing_cooking: Option<f64>,
    pub fuel_used_type: Option<String>,
    pub fuel_used_quantity: Option<f64>,
    pub remarks: Option<String>,
}

impl Record for FoodConsumption {
    type New = NewFoodConsumption;
    const CATEGORY: Category = Category::FoodConsumption;

    fn id(&self) -> i64 {
        self.id
    }

    fn date(&self) -> DateTime<Utc> {
        self.date
    }

    fn prepare(new: &mut NewFoodConsumption) -> Result<(), String> {
        normalize_location(&mut new.location);
        require_text("food_item", &new.food_item)?;
        require_non_negative("quantity_cooked_kg_liter", new.quantity_cooked_kg_liter)?;
        optional_non_negative("water_used_l_washing_cooking", new.water_used_l_washing_cooking)?;
        optional_non_negative("fuel_used_quantity", new.fuel_used_quantity)
    }

    fn store(stores: &Stores) -> &dyn RecordStore<Self> {
        &*stores.food_consumption
    }
}

// =====================
// Goods purchased
// =====================

#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = schema::goods_purchased)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GoodsPurchased {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub location: String,
    pub item_name: String,
    pub category: Option<String>,
    pub quantity: i32,
    pub unit: Option<String>,
    pub vendor_name: Option<String>,
    pub origin: Option<String>,
    pub transport_mode: Option<String>,
    pub transport_distance_km: Option<f64>,
    pub bill_amount_inr: f64,
    pub bill_attachment_url: Option<String>,
    pub packaging_type: Option<String>,
    pub is_recyclable: Option<bool>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Insertable, AsChangeset, Serialize, Deserialize)]
#[diesel(table_name = schema::goods_purchased)]
#[diesel(treat_none_as_null = true)]
#[serde(deny_unknown_fields)]
pub struct NewGoodsPurchased {
    #[serde(default = "Utc::now")]
    pub date: DateTime<Utc>,
    #[serde(default = "default_location", deserialize_with = "location_or_default")]
    pub location: String,
    pub item_name: String,
    pub category: Option<String>,
    pub quantity: i32,
    pub unit: Option<String>,
    pub vendor_name: Option<String>,
    pub origin: Option<String>,
    pub transport_mode: Option<String>,
    pub transport_distance_km: Option<f64>,
    pub bill_amount_inr: f64,
    pub bill_attachment_url: Option<String>,
    pub packaging_type: Option<String>,
    pub is_recyclable: Option<bool>,
    pub remarks: Option<String>,
}

impl Record for GoodsPurchased {
    type New = NewGoodsPurchased;
    const CATEGORY: Category = Category::GoodsPurchased;

    fn id(&self) -> i64 {
        self.id
    }

    fn date(&self) -> DateTime<Utc> {
        self.date
    }

    fn prepare(new: &mut NewGoodsPurchased) -> Result<(), String> {
        normalize_location(&mut new.location);
        require_text("item_name", &new.item_name)?;
        if new.quantity < 0 {
            return Err("quantity must not be negative".to_string());
        }
        require_non_negative("bill_amount_inr", new.bill_amount_inr)
    }

    fn store(stores: &Stores) -> &dyn RecordStore<Self> {
        &*stores.goods_purchased
    }
}

// =====================
// Population
// =====================

#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = schema::population)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Population {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub location: String,
    pub registered_count: i32,
    /// Visitors without registration.
    pub floating_count: i32,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Insertable, AsChangeset, Serialize, Deserialize)]
#[diesel(table_name = schema::population)]
#[diesel(treat_none_as_null = true)]
#[serde(deny_unknown_fields)]
pub struct NewPopulation {
    #[serde(default = "Utc::now")]
    pub date: DateTime<Utc>,
    #[serde(default = "default_location", deserialize_with = "location_or_default")]
    pub location: String,
    pub registered_count: i32,
    pub floating_count: i32,
    pub remarks: Option<String>,
}

impl Record for Population {
    type New = NewPopulation;
    const CATEGORY: Category = Category::Population;

    fn id(&self) -> i64 {
        self.id
    }

    fn date(&self) -> DateTime<Utc> {
        self.date
    }

    fn prepare(new: &mut NewPopulation) -> Result<(), String> {
        normalize_location(&mut new.location);
        if new.registered_count < 0 || new.floating_count < 0 {
            return Err("population counts must not be negative".to_string());
        }
        Ok(())
    }

    fn store(stores: &Stores) -> &dyn RecordStore<Self> {
        &*stores.population
    }
}

// =====================
// Users
// =====================

#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Serialize)]
#[diesel(table_name = schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::users)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

/// Profile fields an administrator may change; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = schema::users)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{DEFAULT_LOCATION, parse_json};

    #[test]
    fn electricity_source_accepts_known_labels() {
        assert_eq!(ElectricitySource::parse("Main Board"), Some(ElectricitySource::MainBoard));
        assert_eq!(ElectricitySource::parse(" main   board"), Some(ElectricitySource::MainBoard));
        assert_eq!(ElectricitySource::parse("GRID"), Some(ElectricitySource::MainBoard));
        assert_eq!(ElectricitySource::parse("Diesel Generator"), Some(ElectricitySource::DieselGenerator));
        assert_eq!(ElectricitySource::parse("Solar"), Some(ElectricitySource::SolarGeneration));
        assert_eq!(ElectricitySource::parse("windmill"), None);
    }

    #[test]
    fn new_record_gets_server_defaults() {
        let before = Utc::now();
        let mut new: NewElectricity = parse_json(br#"{"source": "main board", "grid_electricity_used_kwh": 100}"#).unwrap();
        Electricity::prepare(&mut new).unwrap();

        assert_eq!(new.location, DEFAULT_LOCATION);
        assert_eq!(new.source, "Main Board");
        assert!(new.date >= before);
        assert_eq!(new.grid_electricity_used_kwh, Some(100.0));
        assert_eq!(new.fuel_consumed_liters, None);
    }

    #[test]
    fn unknown_electricity_source_is_rejected() {
        let mut new: NewElectricity = parse_json(br#"{"source": "windmill"}"#).unwrap();
        let err = Electricity::prepare(&mut new).unwrap_err();
        assert!(err.contains("Main Board"), "{err}");
    }

    #[test]
    fn null_location_falls_back_to_default() {
        let mut new: NewWaste = parse_json(br#"{"location": null, "waste_type": "Landfill", "weight_kg": 2}"#).unwrap();
        Waste::prepare(&mut new).unwrap();
        assert_eq!(new.location, DEFAULT_LOCATION);

        let new: NewPopulation =
            parse_json(br#"{"location": "Gate 2", "registered_count": 3, "floating_count": 0}"#).unwrap();
        assert_eq!(new.location, "Gate 2");
    }

    #[test]
    fn missing_required_field_fails_to_parse() {
        assert!(parse_json::<NewWaste>(br#"{"waste_type": "Recyclable"}"#).is_err());
        assert!(parse_json::<NewWaste>(br#"{"waste_type": "Recyclable", "weight_kg": 10, "colour": "red"}"#).is_err());
    }

    #[test]
    fn required_text_must_not_be_blank() {
        let mut new: NewTransport = parse_json(
            br#"{"vehicle_type": "Bus", "fuel_type": "  ", "distance_km": 12.5, "fuel_liters": 4}"#,
        )
        .unwrap();
        assert!(Transport::prepare(&mut new).is_err());
    }

    #[test]
    fn negative_weights_are_rejected() {
        let mut new: NewWaste = parse_json(br#"{"waste_type": "Landfill", "weight_kg": -1}"#).unwrap();
        assert!(Waste::prepare(&mut new).is_err());
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let user = User {
            id: 1,
            name: "Asha".into(),
            email: "asha@example.org".into(),
            password_hash: "$2b$04$secret".into(),
            role: "admin".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "asha@example.org");
    }
}
