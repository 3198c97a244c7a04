//! Evaluator scenarios: schedules, waits, feasibility, penalty stamping.

mod fixtures;

use fixtures::{AttractionBuilder, uniform_context};
use tour_planner::evaluator::{Evaluator, EvaluatorConfig, INFEASIBILITY_PENALTY};
use tour_planner::model::{Itinerary, TransportMode};
use tour_planner::ranking;
use tour_planner::transport::{TransportContext, TransportMatrices};

fn two_city_setup() -> (Vec<tour_planner::model::Attraction>, TransportContext) {
    let attractions = vec![
        AttractionBuilder::new("A")
            .neighborhood("N1")
            .hours(9.0 * 60.0, 18.0 * 60.0)
            .visit(60.0)
            .cost(10.0)
            .build(),
        AttractionBuilder::new("B")
            .neighborhood("N2")
            .hours(10.0 * 60.0, 17.0 * 60.0)
            .visit(30.0)
            .cost(5.0)
            .build(),
    ];
    let names = attractions.iter().map(|a| a.name.clone()).collect();
    let matrices = TransportMatrices {
        car_distance: vec![vec![0.0, 4000.0], vec![4000.0, 0.0]],
        walk_distance: vec![vec![0.0, 4000.0], vec![4000.0, 0.0]],
        car_time: vec![vec![0.0, 20.0], vec![20.0, 0.0]],
        walk_time: vec![vec![0.0, 55.0], vec![55.0, 0.0]],
    };
    (attractions, TransportContext::new(names, matrices))
}

#[test]
fn two_attractions_by_car() {
    let (attractions, transport) = two_city_setup();
    let evaluator = Evaluator::new(&attractions, &transport);

    let solution = evaluator.evaluate_stops(vec![0, 1], Some(vec![TransportMode::Car]));
    assert_eq!(solution.objectives.cost, 19.0);
    assert_eq!(solution.objectives.time, 110.0);
    assert_eq!(solution.objectives.attractions, 2);
    assert_eq!(solution.objectives.neighborhoods, 2);
}

#[test]
fn waiting_for_late_opening() {
    let attractions = vec![
        AttractionBuilder::new("A")
            .neighborhood("N1")
            .hours(9.0 * 60.0, 18.0 * 60.0)
            .visit(60.0)
            .cost(10.0)
            .build(),
        AttractionBuilder::new("B")
            .neighborhood("N2")
            .hours(13.0 * 60.0, 17.0 * 60.0)
            .visit(30.0)
            .cost(5.0)
            .build(),
    ];
    let transport = uniform_context(&attractions, 60.0, 120.0, 8000.0);
    let evaluator = Evaluator::new(&attractions, &transport);

    let evaluation = evaluator.evaluate(&Itinerary::new(vec![0, 1], vec![TransportMode::Car]));
    assert!(evaluation.feasible);
    // Arrive 11:00, wait until 13:00, leave 13:30; tour started 09:00.
    assert_eq!(evaluation.schedule[1].wait, 120.0);
    assert_eq!(evaluation.objectives.time, 270.0);
}

#[test]
fn over_limit_tour_is_penalized_and_dominated() {
    let attractions = vec![
        AttractionBuilder::new("A")
            .neighborhood("N1")
            .open_all_day()
            .visit(400.0)
            .cost(10.0)
            .build(),
        AttractionBuilder::new("B")
            .neighborhood("N2")
            .open_all_day()
            .visit(400.0)
            .cost(5.0)
            .build(),
    ];
    let transport = uniform_context(&attractions, 100.0, 200.0, 10000.0);
    let evaluator = Evaluator::new(&attractions, &transport);

    // 400 + 100 + 400 = 900 elapsed minutes, over the 840 limit.
    let infeasible = evaluator.evaluate(&Itinerary::new(vec![0, 1], vec![TransportMode::Car]));
    assert!(!infeasible.feasible);
    assert_eq!(infeasible.objectives.cost, INFEASIBILITY_PENALTY);
    assert_eq!(infeasible.objectives.time, INFEASIBILITY_PENALTY);

    // Any feasible tour dominates the penalty vector.
    let feasible = evaluator.evaluate(&Itinerary::new(vec![0], vec![]));
    assert!(feasible.feasible);
    assert!(ranking::dominates(
        &feasible.objectives.minimized(),
        &infeasible.objectives.minimized(),
    ));
}

#[test]
fn exact_daily_limit_is_feasible() {
    let attractions = vec![
        AttractionBuilder::new("A")
            .neighborhood("N1")
            .open_all_day()
            .visit(400.0)
            .cost(10.0)
            .build(),
        AttractionBuilder::new("B")
            .neighborhood("N2")
            .open_all_day()
            .visit(400.0)
            .cost(5.0)
            .build(),
    ];
    let transport = uniform_context(&attractions, 40.0, 100.0, 10000.0);
    let evaluator = Evaluator::new(&attractions, &transport);

    // 400 + 40 + 400 = 840 exactly.
    let evaluation = evaluator.evaluate(&Itinerary::new(vec![0, 1], vec![TransportMode::Car]));
    assert!(evaluation.feasible);
    assert_eq!(evaluation.objectives.time, 840.0);
}

#[test]
fn configurable_daily_limit() {
    let (attractions, transport) = two_city_setup();
    let evaluator = Evaluator::with_config(
        &attractions,
        &transport,
        EvaluatorConfig {
            daily_limit_minutes: 109.0,
            ..EvaluatorConfig::default()
        },
    );
    let evaluation = evaluator.evaluate(&Itinerary::new(vec![0, 1], vec![TransportMode::Car]));
    assert!(!evaluation.feasible);
}

#[test]
fn single_stop_time_is_visit_duration() {
    let (attractions, transport) = two_city_setup();
    let evaluator = Evaluator::new(&attractions, &transport);
    let solution = evaluator.evaluate_stops(vec![1], None);
    assert_eq!(solution.objectives.time, 30.0);
    assert_eq!(solution.objectives.neighborhoods, 1);
}

#[test]
fn one_neighborhood_catalog_never_exceeds_one() {
    let attractions: Vec<_> = (0..4)
        .map(|i| {
            AttractionBuilder::new(&format!("spot-{i}"))
                .neighborhood("only")
                .open_all_day()
                .visit(30.0)
                .build()
        })
        .collect();
    let transport = uniform_context(&attractions, 10.0, 12.0, 1000.0);
    let evaluator = Evaluator::new(&attractions, &transport);

    let solution = evaluator.evaluate_stops(vec![0, 1, 2, 3], None);
    assert_eq!(solution.objectives.neighborhoods, 1);
    assert_eq!(solution.objectives.attractions, 4);
}

#[test]
fn walk_legs_are_free() {
    let (attractions, transport) = two_city_setup();
    let evaluator = Evaluator::new(&attractions, &transport);

    let walked = evaluator.evaluate_stops(vec![0, 1], Some(vec![TransportMode::Walk]));
    // Walking takes 55 minutes but costs nothing beyond the entries.
    assert_eq!(walked.objectives.cost, 15.0);
    assert_eq!(walked.objectives.time, 60.0 + 55.0 + 30.0);
}
