use super::*;
use crate::behavior::Tour;

fn docked_at(world: &World, name: &str) -> Option<String> {
    vessel(world, name).hull().docked_depot().map(|id| id.0.clone())
}

#[test]
fn test_tour_visits_each_depot_nearest_first_and_returns_home() {
    let mut world = harbor();
    let ship = launch(&mut world, VesselKind::CruiseShip, "Queen", 0.0, 0.0);
    order(
        &mut world,
        &ship,
        Order::DepotAndSpeed {
            depot: depot(ALPHA),
            speed: 10.0,
        },
    )
    .unwrap();

    let mut visits: Vec<String> = Vec::new();
    for _ in 0..30 {
        world.update();
        if let Some(at) = docked_at(&world, &ship) {
            if visits.last() != Some(&at) {
                visits.push(at);
            }
        }
    }

    assert_eq!(visits, vec![ALPHA, BRAVO, CHARLIE, ALPHA]);
    assert_eq!(tour_leg(&world, &ship), Leg::Idle);
    assert_eq!(docked_at(&world, &ship).as_deref(), Some(ALPHA));
}

#[test]
fn test_each_stop_docks_then_refuels_then_rests_then_departs() {
    let mut world = harbor();
    let ship = launch(&mut world, VesselKind::CruiseShip, "Queen", 0.0, 0.0);
    order(
        &mut world,
        &ship,
        Order::DepotAndSpeed {
            depot: depot(ALPHA),
            speed: 10.0,
        },
    )
    .unwrap();
    assert_eq!(tour_leg(&world, &ship), Leg::EnRoute);

    let expected = [Leg::Arriving, Leg::Resting, Leg::Departing, Leg::EnRoute];
    for leg in expected {
        world.update();
        assert_eq!(tour_leg(&world, &ship), leg);
    }
    assert_eq!(
        vessel(&world, &ship).hull().destination_depot(),
        Some(&depot(BRAVO))
    );

    // reaching Bravo burns 20, which the next refuel replaces from Bravo's stock
    run_ticks(&mut world, 2);
    assert_close(vessel(&world, &ship).hull().fuel(), 500.0);
    assert_close(world.depot(BRAVO).unwrap().fuel(), 980.0);
}

#[test]
fn test_navigation_command_cancels_the_tour() {
    let mut world = harbor();
    let ship = launch(&mut world, VesselKind::CruiseShip, "Queen", 0.0, 0.0);
    order(
        &mut world,
        &ship,
        Order::DepotAndSpeed {
            depot: depot(CHARLIE),
            speed: 10.0,
        },
    )
    .unwrap();
    world.update();

    order(
        &mut world,
        &ship,
        Order::CourseAndSpeed {
            course: 90.0,
            speed: 5.0,
        },
    )
    .unwrap();

    assert_eq!(tour_leg(&world, &ship), Leg::Idle);
    assert_eq!(vessel(&world, &ship).hull().movement(), &Movement::OnCourse);
}

#[test]
fn test_rejected_tour_start_leaves_state_alone() {
    let mut world = harbor();
    let ship = launch(&mut world, VesselKind::CruiseShip, "Queen", 0.0, 0.0);

    let err = order(
        &mut world,
        &ship,
        Order::DepotAndSpeed {
            depot: depot(ALPHA),
            speed: 16.0,
        },
    )
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::SpeedExceeded);
    assert_eq!(tour_leg(&world, &ship), Leg::Idle);
    assert_eq!(vessel(&world, &ship).hull().movement(), &Movement::Stopped);
}

#[test]
fn test_unknown_origin_is_an_unknown_entity() {
    let mut world = harbor();
    let ship = launch(&mut world, VesselKind::CruiseShip, "Queen", 0.0, 0.0);
    let err = order(
        &mut world,
        &ship,
        Order::DepotAndSpeed {
            depot: depot("Nowhere"),
            speed: 5.0,
        },
    )
    .unwrap_err();
    assert_eq!(err, FleetError::UnknownEntity("Nowhere".to_string()));
}

#[test]
fn test_equidistant_stops_are_visited_in_name_order() {
    let mut world = World::new();
    for (name, x) in [("Home", 0.0), ("Zulu", 10.0), ("Mike", -10.0)] {
        world
            .add_depot(Depot::new(depot(name), Point::new(x, 0.0), 1000.0, 0.0))
            .unwrap();
    }
    let ship = launch(&mut world, VesselKind::CruiseShip, "Queen", 0.0, 0.0);
    order(
        &mut world,
        &ship,
        Order::DepotAndSpeed {
            depot: depot("Home"),
            speed: 10.0,
        },
    )
    .unwrap();

    let mut visits: Vec<String> = Vec::new();
    for _ in 0..40 {
        world.update();
        if let Some(at) = docked_at(&world, &ship) {
            if visits.last() != Some(&at) {
                visits.push(at);
            }
        }
    }

    assert_eq!(visits, vec!["Home", "Mike", "Zulu", "Home"]);
    assert_eq!(tour_leg(&world, &ship), Leg::Idle);
}

#[test]
fn test_running_out_of_fuel_cancels_the_tour() {
    let mut world = harbor();
    let spec = VesselSpec {
        fuel_capacity: 10.0,
        ..plain_spec()
    };
    world
        .add_vessel(Vessel::custom(
            VesselId::from("Launch"),
            Point::default(),
            spec,
            Behavior::Touring(Tour::default()),
        ))
        .unwrap();
    order(
        &mut world,
        "Launch",
        Order::DepotAndSpeed {
            depot: depot(CHARLIE),
            speed: 10.0,
        },
    )
    .unwrap();
    assert_eq!(tour_leg(&world, "Launch"), Leg::EnRoute);

    // 10 fuel at 2 per unit covers 5 of the 20 to Charlie
    world.update();

    assert_eq!(
        vessel(&world, "Launch").hull().movement(),
        &Movement::DeadInTheWater
    );
    assert_at(&world, "Launch", 0.0, 5.0);
    assert_eq!(tour_leg(&world, "Launch"), Leg::Idle);
}
