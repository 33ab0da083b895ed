//! Deterministic demo records for every category, for local runs and demos.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc, Weekday};
use log::info;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::db::models::{
    Accommodation, Electricity, FoodConsumption, GoodsPurchased, NewAccommodation, NewElectricity,
    NewFoodConsumption, NewGoodsPurchased, NewPopulation, NewTransport, NewWaste, NewWaterConsumption,
    NewWaterTreatment, Population, Transport, Waste, WaterConsumption, WaterTreatment,
};
use crate::store::{Record, Stores};

const SEED: u64 = 0x0420_1337_DEAD_BEEF;
const DAYS: i64 = 30;
const CAMPUS: &str = "Main Campus";

const MEALS: [(&str, f64); 4] = [("Rice", 120.0), ("Dal", 80.0), ("Chapati", 60.0), ("Vegetable Curry", 90.0)];
const TRIPS: [(&str, &str, f64); 3] = [("Bus", "Diesel", 4.5), ("Car", "Petrol", 14.0), ("Van", "Diesel", 9.0)];
const GOODS: [(&str, &str, f64); 4] = [
    ("Paper Reams", "Stationery", 250.0),
    ("Cleaning Supplies", "Housekeeping", 400.0),
    ("LED Bulbs", "Electrical", 180.0),
    ("Water Bottles", "Catering", 20.0),
];

/// Seeds `DAYS` days of history ending yesterday. Does nothing if any
/// measurement store already holds data.
pub fn run(stores: &Stores) -> Result<(), String> {
    if !all_empty(stores)? {
        info!("Demo data: stores already contain records; skipping");
        return Ok(());
    }

    let mut rng = SmallRng::seed_from_u64(SEED);
    let today = Utc::now().date_naive();
    let first = today - Duration::days(DAYS);
    let mut inserted = 0usize;

    info!("Demo data: generating {} day(s) from {} to {}", DAYS, first, today - Duration::days(1));

    let mut day = first;
    while day < today {
        let weekend = matches!(day.weekday(), Weekday::Sat | Weekday::Sun);
        // Fewer people on campus at weekends.
        let load = if weekend { 0.6 } else { 1.0 };
        let day_index = (day - first).num_days();

        inserted += seed_population(stores, &mut rng, day, load)?;
        inserted += seed_electricity(stores, &mut rng, day, load)?;
        inserted += seed_water(stores, &mut rng, day, load)?;
        inserted += seed_waste(stores, &mut rng, day, load, day_index % 7 == 0)?;
        inserted += seed_transport(stores, &mut rng, day, load)?;
        inserted += seed_food(stores, &mut rng, day, load)?;
        inserted += seed_accommodation(stores, &mut rng, day, weekend)?;
        if day_index % 3 == 0 {
            inserted += seed_goods(stores, &mut rng, day)?;
        }

        day += Duration::days(1);
    }

    info!("Demo data: inserted {} record(s)", inserted);
    Ok(())
}

fn all_empty(stores: &Stores) -> Result<bool, String> {
    Ok(is_empty::<Electricity>(stores)?
        && is_empty::<WaterConsumption>(stores)?
        && is_empty::<WaterTreatment>(stores)?
        && is_empty::<Waste>(stores)?
        && is_empty::<Transport>(stores)?
        && is_empty::<Accommodation>(stores)?
        && is_empty::<FoodConsumption>(stores)?
        && is_empty::<GoodsPurchased>(stores)?
        && is_empty::<Population>(stores)?)
}

fn is_empty<R: Record>(stores: &Stores) -> Result<bool, String> {
    let rows = stores
        .records::<R>()
        .list()
        .map_err(|e| format!("Demo data: reading {} failed: {}", R::CATEGORY, e))?;
    Ok(rows.is_empty())
}

fn insert<R: Record>(stores: &Stores, mut new: R::New) -> Result<usize, String> {
    R::prepare(&mut new).map_err(|e| format!("Demo data: invalid {}: {}", R::CATEGORY, e))?;
    stores
        .records::<R>()
        .create(new)
        .map_err(|e| format!("Demo data: inserting {} failed: {}", R::CATEGORY, e))?;
    Ok(1)
}

fn at(day: NaiveDate, hour: i64) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc() + Duration::hours(hour)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn seed_population(stores: &Stores, rng: &mut SmallRng, day: NaiveDate, load: f64) -> Result<usize, String> {
    let registered = (rng.random_range(800.0..=1200.0) * load) as i32;
    let floating = (rng.random_range(100.0..=300.0) * load) as i32;
    insert::<Population>(
        stores,
        NewPopulation {
            date: at(day, 9),
            location: CAMPUS.to_string(),
            registered_count: registered,
            floating_count: floating,
            remarks: None,
        },
    )
}

fn seed_electricity(stores: &Stores, rng: &mut SmallRng, day: NaiveDate, load: f64) -> Result<usize, String> {
    let grid_kwh = round1(rng.random_range(1800.0..=2600.0) * load);
    let mut count = insert::<Electricity>(
        stores,
        NewElectricity {
            date: at(day, 20),
            location: CAMPUS.to_string(),
            source: "Main Board".to_string(),
            dg_capacity_kva: None,
            running_time_hours: None,
            fuel_consumed_liters: None,
            fuel_type: None,
            energy_generated_dg_kwh: None,
            grid_electricity_used_kwh: Some(grid_kwh),
            electricity_bill_kwh: Some(grid_kwh),
            electricity_bill_cost_inr: Some(round1(grid_kwh * 8.5)),
            electrical_appliances_count: Some(rng.random_range(350..=420)),
            solar_generated_kwh: None,
            remarks: None,
        },
    )?;

    // Outages are occasional; the generator only runs on those days.
    if rng.random_bool(0.3) {
        let hours = round1(rng.random_range(1.0..=6.0));
        let liters = round1(hours * rng.random_range(12.0..=16.0));
        count += insert::<Electricity>(
            stores,
            NewElectricity {
                date: at(day, 21),
                location: CAMPUS.to_string(),
                source: "Diesel Generator".to_string(),
                dg_capacity_kva: Some(250.0),
                running_time_hours: Some(hours),
                fuel_consumed_liters: Some(liters),
                fuel_type: Some("Diesel".to_string()),
                energy_generated_dg_kwh: Some(round1(liters * 3.2)),
                grid_electricity_used_kwh: None,
                electricity_bill_kwh: None,
                electricity_bill_cost_inr: None,
                electrical_appliances_count: None,
                solar_generated_kwh: None,
                remarks: Some("Grid outage".to_string()),
            },
        )?;
    }

    count += insert::<Electricity>(
        stores,
        NewElectricity {
            date: at(day, 18),
            location: "Rooftop Array".to_string(),
            source: "Solar Generation".to_string(),
            dg_capacity_kva: None,
            running_time_hours: None,
            fuel_consumed_liters: None,
            fuel_type: None,
            energy_generated_dg_kwh: None,
            grid_electricity_used_kwh: None,
            electricity_bill_kwh: None,
            electricity_bill_cost_inr: None,
            electrical_appliances_count: None,
            solar_generated_kwh: Some(round1(rng.random_range(300.0..=500.0))),
            remarks: None,
        },
    )?;
    Ok(count)
}

fn seed_water(stores: &Stores, rng: &mut SmallRng, day: NaiveDate, load: f64) -> Result<usize, String> {
    let kld = round1(rng.random_range(150.0..=220.0) * load);
    let treated = round1(kld * 1000.0 * rng.random_range(0.7..=0.85));
    let mut count = insert::<WaterConsumption>(
        stores,
        NewWaterConsumption {
            date: at(day, 19),
            location: CAMPUS.to_string(),
            water_source: Some("Municipal".to_string()),
            cumulative_meter_reading: None,
            total_consumption_kld: kld,
            per_capita_consumption_lpd: Some(round1(kld * 1000.0 / (1100.0 * load))),
            usage_type: Some("Mixed".to_string()),
            remarks: None,
        },
    )?;
    count += insert::<WaterTreatment>(
        stores,
        NewWaterTreatment {
            date: at(day, 22),
            location: "STP".to_string(),
            treated_liters_per_day: Some(treated),
            ultra_filtration_liters_per_day: Some(round1(treated * 0.4)),
            percentage_water_reused: Some(round1(rng.random_range(30.0..=55.0))),
            electricity_used_kwh: Some(round1(rng.random_range(200.0..=300.0))),
            chemicals_used_description: Some("Chlorine, alum".to_string()),
            chemicals_used_quantity_kg: Some(round1(rng.random_range(10.0..=25.0))),
            remarks: None,
        },
    )?;
    Ok(count)
}

fn seed_waste(
    stores: &Stores,
    rng: &mut SmallRng,
    day: NaiveDate,
    load: f64,
    weekly_pickup: bool,
) -> Result<usize, String> {
    let mut streams = vec![
        ("Biodegradable", "Food", rng.random_range(300.0..=500.0) * load),
        ("Recyclable", "Plastic", rng.random_range(40.0..=80.0) * load),
        ("Recyclable", "Paper", rng.random_range(40.0..=70.0) * load),
        ("Non-Biodegradable", "Mixed", rng.random_range(60.0..=120.0) * load),
    ];
    if weekly_pickup {
        streams.push(("Non-Biodegradable", "E-waste", rng.random_range(5.0..=25.0)));
    }

    let mut count = 0;
    for (waste_type, sub_category, kg) in streams {
        count += insert::<Waste>(
            stores,
            NewWaste {
                date: at(day, 17),
                location: CAMPUS.to_string(),
                waste_type: waste_type.to_string(),
                sub_category: Some(sub_category.to_string()),
                weight_kg: round1(kg),
                collection_method: Some("Segregated bins".to_string()),
                transport_mode: Some("Truck".to_string()),
                destination: Some(
                    match waste_type {
                        "Biodegradable" => "Compost yard",
                        "Recyclable" => "Recycler",
                        _ => "Municipal landfill",
                    }
                    .to_string(),
                ),
                remarks: None,
            },
        )?;
    }
    Ok(count)
}

fn seed_transport(stores: &Stores, rng: &mut SmallRng, day: NaiveDate, load: f64) -> Result<usize, String> {
    let mut count = 0;
    for (index, (vehicle, fuel, km_per_liter)) in TRIPS.iter().enumerate() {
        let distance = round1(rng.random_range(20.0..=90.0) * load);
        count += insert::<Transport>(
            stores,
            NewTransport {
                date: at(day, 8 + index as i64 * 3),
                location: CAMPUS.to_string(),
                vehicle_type: vehicle.to_string(),
                fuel_type: fuel.to_string(),
                vehicle_number: Some(format!("KA-01-{:04}", 1000 + index * 111)),
                start_location: Some("City Station".to_string()),
                end_location: Some(CAMPUS.to_string()),
                distance_km: distance,
                fuel_liters: round1(distance / km_per_liter),
                people_travelled_count: Some(rng.random_range(2..=40)),
                fuel_efficiency_km_per_liter: Some(*km_per_liter),
                remarks: None,
            },
        )?;
    }
    Ok(count)
}

fn seed_food(stores: &Stores, rng: &mut SmallRng, day: NaiveDate, load: f64) -> Result<usize, String> {
    let mut count = 0;
    for (item, kg) in MEALS {
        let quantity = round1(kg * load * rng.random_range(0.85..=1.15));
        count += insert::<FoodConsumption>(
            stores,
            NewFoodConsumption {
                date: at(day, 12),
                location: "Central Kitchen".to_string(),
                food_item: item.to_string(),
                quantity_cooked_kg_liter: quantity,
                no_of_meals_served: Some((quantity * 8.0) as i32),
                raw_material_source: Some("Local market".to_string()),
                water_used_l_washing_cooking: Some(round1(quantity * rng.random_range(4.0..=6.0))),
                fuel_used_type: Some("LPG".to_string()),
                fuel_used_quantity: Some(round1(quantity * 0.05)),
                remarks: None,
            },
        )?;
    }
    Ok(count)
}

fn seed_accommodation(stores: &Stores, rng: &mut SmallRng, day: NaiveDate, weekend: bool) -> Result<usize, String> {
    let people = if weekend {
        rng.random_range(5..=20)
    } else {
        rng.random_range(20..=60)
    };
    insert::<Accommodation>(
        stores,
        NewAccommodation {
            date: at(day, 23),
            location: "Guest House".to_string(),
            participant_guest_name: None,
            category: Some("Visiting faculty".to_string()),
            people_count: people,
            accommodation_type: Some("Hostel".to_string()),
            room_type: Some("Twin sharing".to_string()),
            no_of_rooms: Some((people + 1) / 2),
            nights: 1,
            electricity_consumption_kwh: Some(round1(f64::from(people) * rng.random_range(3.0..=5.0))),
            water_consumption_lpd: Some(round1(rng.random_range(90.0..=140.0))),
            meals_provided: Some(true),
            transport_mode_to_venue: Some("Bus".to_string()),
            remarks: None,
        },
    )
}

fn seed_goods(stores: &Stores, rng: &mut SmallRng, day: NaiveDate) -> Result<usize, String> {
    let (item, category, unit_price) = GOODS[rng.random_range(0..GOODS.len())];
    let quantity = rng.random_range(5..=50);
    insert::<GoodsPurchased>(
        stores,
        NewGoodsPurchased {
            date: at(day, 11),
            location: "Stores".to_string(),
            item_name: item.to_string(),
            category: Some(category.to_string()),
            quantity,
            unit: Some("pcs".to_string()),
            vendor_name: Some("Campus Supplies Co.".to_string()),
            origin: Some("Local".to_string()),
            transport_mode: Some("Van".to_string()),
            transport_distance_km: Some(round1(rng.random_range(5.0..=40.0))),
            bill_amount_inr: round1(f64::from(quantity) * unit_price),
            bill_attachment_url: None,
            packaging_type: Some("Cardboard".to_string()),
            is_recyclable: Some(true),
            remarks: None,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::dashboard::{AggregationWindow, summarize};
    use crate::services::emission_factors::EmissionFactors;

    #[test]
    fn seeds_every_category() {
        let (stores, _) = Stores::in_memory();
        run(&stores).unwrap();

        assert_eq!(stores.records::<Population>().list().unwrap().len(), DAYS as usize);
        assert!(!is_empty::<Electricity>(&stores).unwrap());
        assert!(!is_empty::<WaterConsumption>(&stores).unwrap());
        assert!(!is_empty::<WaterTreatment>(&stores).unwrap());
        assert!(!is_empty::<Waste>(&stores).unwrap());
        assert!(!is_empty::<Transport>(&stores).unwrap());
        assert!(!is_empty::<Accommodation>(&stores).unwrap());
        assert!(!is_empty::<FoodConsumption>(&stores).unwrap());
        assert!(!is_empty::<GoodsPurchased>(&stores).unwrap());

        let summary = summarize(&stores, &EmissionFactors::default(), &AggregationWindow::default()).unwrap();
        assert!(summary.total_carbon_footprint_co2e > 0.0);
        assert!(summary.per_capita_footprint_co2e > 0.0);
    }

    #[test]
    fn second_run_is_a_no_op() {
        let (stores, _) = Stores::in_memory();
        run(&stores).unwrap();
        let before = stores.records::<Waste>().list().unwrap().len();
        run(&stores).unwrap();
        assert_eq!(stores.records::<Waste>().list().unwrap().len(), before);
    }

    #[test]
    fn output_is_deterministic() {
        let (a, _) = Stores::in_memory();
        let (b, _) = Stores::in_memory();
        run(&a).unwrap();
        run(&b).unwrap();

        let weights = |s: &Stores| {
            s.records::<Waste>()
                .list()
                .unwrap()
                .iter()
                .map(|w| w.weight_kg)
                .collect::<Vec<_>>()
        };
        assert_eq!(weights(&a), weights(&b));
    }
}
