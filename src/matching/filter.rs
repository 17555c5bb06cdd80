use crate::domain::request::OrgLevel;
use crate::domain::vehicle::{FuelType, Vehicle};
use rand::Rng;

/// Eligibility rules for a single request, evaluated over a pool snapshot.
///
/// The Level5 (experts) rule takes precedence over the priority flag: experts
/// are capped to small-displacement vehicles no matter how urgent the request.
pub fn filter_and_rank(vehicles: &[Vehicle], level: OrgLevel, is_high_priority: bool) -> Vec<Vehicle> {
    let mut eligible: Vec<Vehicle> = vehicles
        .iter()
        .filter(|v| v.is_matchable())
        .filter(|v| passes_position_rules(v, level, is_high_priority))
        .cloned()
        .collect();

    eligible.sort_by(|a, b| {
        b.engine_displacement_cc
            .cmp(&a.engine_displacement_cc)
            .then(b.manufacture_year.cmp(&a.manufacture_year))
    });
    eligible
}

fn passes_position_rules(vehicle: &Vehicle, level: OrgLevel, is_high_priority: bool) -> bool {
    let cc = vehicle.engine_displacement_cc;
    let year = vehicle.manufacture_year;

    if level == OrgLevel::Level5 {
        if cc == 1200 {
            return (2001..2018).contains(&year);
        }
        return cc < 1200 && year >= 2001;
    }

    if is_high_priority {
        return true;
    }

    if vehicle.fuel_type == FuelType::Electric {
        return (120..=130).contains(&cc) && year >= 2020;
    }

    (1200..1300).contains(&cc) && year >= 2018 || cc >= 1300 && year >= 2010
}

/// Restrict a ranked list to vehicles of one requested model. Model names
/// arrive from a fixed dropdown but are compared case-insensitively anyway.
pub fn filter_for_model(ranked: &[Vehicle], model: &str) -> Vec<Vehicle> {
    ranked
        .iter()
        .filter(|v| v.model.eq_ignore_ascii_case(model))
        .cloned()
        .collect()
}

/// Pick the winning vehicle from a ranked list. When several vehicles tie on
/// (cc, year) at the head, the winner is drawn uniformly from the tie group.
/// The RNG is injected so callers can seed it for reproducibility.
pub fn select_top<R: Rng>(ranked: &[Vehicle], rng: &mut R) -> Option<Vehicle> {
    let best = ranked.first()?;
    let ties: Vec<&Vehicle> = ranked
        .iter()
        .take_while(|v| {
            v.engine_displacement_cc == best.engine_displacement_cc
                && v.manufacture_year == best.manufacture_year
        })
        .collect();

    if ties.len() == 1 {
        return Some(best.clone());
    }
    Some(ties[rng.gen_range(0..ties.len())].clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::vehicle::{AvailabilityStatus, SourcePool, VehicleCategory};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn vehicle(plate: &str, cc: i32, year: i32) -> Vehicle {
        Vehicle {
            id: plate.to_string(),
            plate_number: plate.to_string(),
            model: "Corolla".to_string(),
            category: VehicleCategory::Automobile,
            manufacture_year: year,
            engine_displacement_cc: cc,
            fuel_type: FuelType::Other,
            availability_status: AvailabilityStatus::Ready,
            source_pool: SourcePool::Owned,
        }
    }

    #[test]
    fn drops_non_ready_and_non_automobile() {
        let mut busy = vehicle("A-1", 1300, 2020);
        busy.availability_status = AvailabilityStatus::Assigned;
        let mut truck = vehicle("A-2", 1300, 2020);
        truck.category = VehicleCategory::Other;

        let out = filter_and_rank(&[busy, truck], OrgLevel::Level3, true);
        assert!(out.is_empty());
    }

    #[test]
    fn level5_rule_overrides_high_priority() {
        let pool = vec![vehicle("A-1", 1200, 2015), vehicle("A-2", 1500, 2022)];
        let out = filter_and_rank(&pool, OrgLevel::Level5, true);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].plate_number, "A-1");
    }

    #[test]
    fn level5_bounds_on_the_1200cc_window() {
        let pool = vec![
            vehicle("A-1", 1200, 2000),
            vehicle("A-2", 1200, 2001),
            vehicle("A-3", 1200, 2017),
            vehicle("A-4", 1200, 2018),
            vehicle("A-5", 1100, 2001),
        ];
        let out = filter_and_rank(&pool, OrgLevel::Level5, false);
        let plates: Vec<&str> = out.iter().map(|v| v.plate_number.as_str()).collect();
        assert_eq!(plates, vec!["A-2", "A-3", "A-5"]);
    }

    #[test]
    fn high_priority_non_level5_keeps_everything_ready() {
        let pool = vec![vehicle("A-1", 900, 1995), vehicle("A-2", 2000, 2024)];
        let out = filter_and_rank(&pool, OrgLevel::Level2, true);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn low_priority_numeric_bands() {
        let pool = vec![
            vehicle("A-1", 1250, 2019), // 1200..1300 band, new enough
            vehicle("A-2", 1250, 2017), // too old for the band
            vehicle("A-3", 1300, 2010), // >=1300 band boundary
            vehicle("A-4", 1300, 2009),
            vehicle("A-5", 1199, 2024), // below every band
        ];
        let out = filter_and_rank(&pool, OrgLevel::Level3, false);
        let plates: Vec<&str> = out.iter().map(|v| v.plate_number.as_str()).collect();
        assert_eq!(plates, vec!["A-3", "A-1"]);
    }

    #[test]
    fn electric_band_is_narrow() {
        let mut ev_ok = vehicle("E-1", 125, 2021);
        ev_ok.fuel_type = FuelType::Electric;
        let mut ev_old = vehicle("E-2", 125, 2019);
        ev_old.fuel_type = FuelType::Electric;
        let mut ev_big = vehicle("E-3", 131, 2021);
        ev_big.fuel_type = FuelType::Electric;

        let out = filter_and_rank(&[ev_ok, ev_old, ev_big], OrgLevel::Level2, false);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].plate_number, "E-1");
    }

    #[test]
    fn ranking_is_cc_then_year_descending() {
        let pool = vec![
            vehicle("A-1", 1300, 2012),
            vehicle("A-2", 1500, 2010),
            vehicle("A-3", 1300, 2016),
        ];
        let out = filter_and_rank(&pool, OrgLevel::Level2, true);
        let plates: Vec<&str> = out.iter().map(|v| v.plate_number.as_str()).collect();
        assert_eq!(plates, vec!["A-2", "A-3", "A-1"]);
    }

    #[test]
    fn tie_break_is_seed_deterministic_and_stays_in_the_tie_group() {
        let pool = vec![
            vehicle("A-1", 1300, 2016),
            vehicle("A-2", 1300, 2016),
            vehicle("A-3", 1300, 2010),
        ];
        let mut rng = StdRng::seed_from_u64(7);
        let first = select_top(&pool, &mut rng).unwrap();
        assert!(first.plate_number == "A-1" || first.plate_number == "A-2");

        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);
        assert_eq!(
            select_top(&pool, &mut rng_a).unwrap().plate_number,
            select_top(&pool, &mut rng_b).unwrap().plate_number
        );
    }

    #[test]
    fn select_top_without_ties_takes_the_head() {
        let pool = vec![vehicle("A-1", 1500, 2020), vehicle("A-2", 1300, 2020)];
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(select_top(&pool, &mut rng).unwrap().plate_number, "A-1");
    }
}
