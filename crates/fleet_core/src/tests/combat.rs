use super::*;
use crate::behavior::retreat_depot;

fn attack(world: &mut World, attacker: &str, target: &str) -> Result<Dispatch> {
    order(
        world,
        attacker,
        Order::Attack {
            target: target.to_string(),
        },
    )
}

fn resistance(world: &World, name: &str) -> i32 {
    vessel(world, name).hull().resistance()
}

#[test]
fn test_cruiser_sinks_a_target_in_range_and_then_stands_down() {
    let mut world = harbor();
    let cruiser = launch(&mut world, VesselKind::Cruiser, "Xerxes", 0.0, 0.0);
    let liner = launch(&mut world, VesselKind::CruiseShip, "Queen", 0.0, 10.0);
    let log = NotificationLog::shared();
    world.attach(log.clone());

    attack(&mut world, &cruiser, &liner).unwrap();
    world.update();

    assert!(matches!(world.vessel(&liner), Err(FleetError::UnknownEntity(_))));
    assert_eq!(log.borrow().removed(), vec!["Queen"]);
    assert_eq!(attacking(&world, &cruiser).as_deref(), Some("Queen"));

    world.update();
    assert_eq!(attacking(&world, &cruiser), None);
}

#[test]
fn test_cruiser_disengages_when_the_target_is_out_of_range() {
    let mut world = harbor();
    let cruiser = launch(&mut world, VesselKind::Cruiser, "Xerxes", 0.0, 0.0);
    let liner = launch(&mut world, VesselKind::CruiseShip, "Queen", 0.0, 30.0);

    attack(&mut world, &cruiser, &liner).unwrap();
    world.update();

    assert_eq!(attacking(&world, &cruiser), None);
    assert_eq!(resistance(&world, &liner), 0);
    assert_eq!(vessel(&world, &cruiser).hull().movement(), &Movement::Stopped);
}

#[test]
fn test_torpedo_boat_closes_the_range_before_firing() {
    let mut world = harbor();
    let boat = launch(&mut world, VesselKind::TorpedoBoat, "Tiger", 0.0, 0.0);
    let liner = launch(&mut world, VesselKind::CruiseShip, "Queen", 0.0, 30.0);

    attack(&mut world, &boat, &liner).unwrap();
    world.update();
    assert_eq!(
        vessel(&world, &boat).hull().movement(),
        &Movement::ToPoint(Point::new(0.0, 30.0))
    );

    world.update();
    assert_at(&world, &boat, 0.0, 12.0);
    world.update();
    assert_at(&world, &boat, 0.0, 24.0);
    assert!(world.vessel(&liner).is_ok());

    world.update();
    assert_at(&world, &boat, 0.0, 30.0);
    assert!(world.vessel(&liner).is_err());
    // 30 units at 5 per unit
    assert_close(vessel(&world, &boat).hull().fuel(), 650.0);
}

#[test]
fn test_a_hit_cruiser_returns_fire_and_a_hit_torpedo_boat_runs() {
    let mut world = harbor();
    let boat = launch(&mut world, VesselKind::TorpedoBoat, "Tiger", 0.0, 0.0);
    let cruiser = launch(&mut world, VesselKind::Cruiser, "Xerxes", 0.0, 3.0);

    attack(&mut world, &boat, &cruiser).unwrap();
    world.update();

    assert_eq!(resistance(&world, &cruiser), 3);
    assert_eq!(attacking(&world, &cruiser).as_deref(), Some("Tiger"));

    assert_eq!(resistance(&world, &boat), 6);
    assert_eq!(attacking(&world, &boat), None);
    // Charlie is the nearest depot at least 15 from the cruiser
    assert_eq!(
        vessel(&world, &boat).hull().destination_depot(),
        Some(&depot(CHARLIE))
    );
    assert_close(vessel(&world, &boat).hull().speed(), 12.0);
}

#[test]
fn test_evasion_with_nowhere_to_go_holds_position() {
    let mut world = World::new();
    let cruiser = launch(&mut world, VesselKind::Cruiser, "Xerxes", 0.0, 0.0);
    let boat = launch(&mut world, VesselKind::TorpedoBoat, "Tiger", 0.0, 3.0);

    attack(&mut world, &cruiser, &boat).unwrap();
    world.update();

    assert_eq!(resistance(&world, &boat), 6);
    assert_eq!(vessel(&world, &boat).hull().movement(), &Movement::Stopped);
}

#[test]
fn test_direct_hit_on_an_unarmed_vessel_sinks_it_immediately() {
    let mut world = harbor();
    let cruiser = launch(&mut world, VesselKind::Cruiser, "Xerxes", 0.0, 0.0);
    let tanker = launch(&mut world, VesselKind::Tanker, "Valdez", 50.0, 50.0);

    let outcome = world.receive_hit(&tanker, 1, &cruiser).unwrap();

    assert_eq!(outcome, HitOutcome::Sunk);
    assert!(world.vessel(&tanker).is_err());
}

#[test]
fn test_negative_force_is_rejected_without_healing() {
    let mut world = harbor();
    let cruiser = launch(&mut world, VesselKind::Cruiser, "Xerxes", 0.0, 0.0);
    let tanker = launch(&mut world, VesselKind::Tanker, "Valdez", 50.0, 50.0);

    let err = world.receive_hit(&cruiser, -4, &tanker).unwrap_err();
    assert_eq!(err, FleetError::InvalidForce(-4));
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert_eq!(resistance(&world, &cruiser), 6);

    let err = world.receive_hit(&cruiser, i32::MIN, &tanker).unwrap_err();
    assert_eq!(err, FleetError::InvalidForce(i32::MIN));
    assert_eq!(resistance(&world, &cruiser), 6);
}

#[test]
fn test_overwhelming_force_sinks_without_overflow() {
    let mut world = harbor();
    let cruiser = launch(&mut world, VesselKind::Cruiser, "Xerxes", 0.0, 0.0);
    let other = launch(&mut world, VesselKind::Cruiser, "Ajax", 50.0, 50.0);

    assert_eq!(
        world.receive_hit(&cruiser, i32::MAX, &other).unwrap(),
        HitOutcome::Sunk
    );
    assert!(world.vessel(&cruiser).is_err());
}

#[test]
fn test_attack_orders_are_validated() {
    let mut world = harbor();
    let cruiser = launch(&mut world, VesselKind::Cruiser, "Xerxes", 0.0, 0.0);
    let liner = launch(&mut world, VesselKind::CruiseShip, "Queen", 0.0, 10.0);
    let tanker = launch(&mut world, VesselKind::Tanker, "Valdez", 0.0, 5.0);
    world.create_group("Navy").unwrap();

    assert_eq!(
        attack(&mut world, &cruiser, &cruiser).unwrap_err(),
        FleetError::SelfTarget("Xerxes".to_string())
    );
    assert_eq!(
        attack(&mut world, &cruiser, "Navy").unwrap_err(),
        FleetError::NotAnIndividual("Navy".to_string())
    );
    assert_eq!(
        attack(&mut world, &cruiser, "Nobody").unwrap_err().kind(),
        ErrorKind::UnknownEntity
    );
    assert_eq!(
        attack(&mut world, &tanker, &liner).unwrap_err().kind(),
        ErrorKind::NotSupported
    );

    assert_eq!(
        order(&mut world, &cruiser, Order::StopAttack).unwrap_err(),
        FleetError::NotEngaged("Xerxes".to_string())
    );
    attack(&mut world, &cruiser, &liner).unwrap();
    assert_eq!(
        attack(&mut world, &cruiser, &liner).unwrap_err(),
        FleetError::AlreadyEngaged("Queen".to_string())
    );
    order(&mut world, &cruiser, Order::StopAttack).unwrap();
    assert_eq!(attacking(&world, &cruiser), None);
}

#[test]
fn test_navigation_command_breaks_off_an_attack() {
    let mut world = harbor();
    let cruiser = launch(&mut world, VesselKind::Cruiser, "Xerxes", 0.0, 0.0);
    let liner = launch(&mut world, VesselKind::CruiseShip, "Queen", 0.0, 40.0);
    attack(&mut world, &cruiser, &liner).unwrap();

    order(
        &mut world,
        &cruiser,
        Order::CourseAndSpeed {
            course: 0.0,
            speed: 20.0,
        },
    )
    .unwrap();

    assert_eq!(attacking(&world, &cruiser), None);
}

#[test]
fn test_retreat_prefers_the_nearest_safe_depot_then_the_farthest() {
    let mut depots = DepotTable::new();
    for (name, x, y) in [("North", 0.0, 10.0), ("South", 0.0, -10.0), ("East", 20.0, 0.0)] {
        depots.insert(depot(name), Depot::new(depot(name), Point::new(x, y), 0.0, 0.0));
    }
    let threat = Point::new(0.0, 0.0);

    // North and South tie at 10, name order decides
    assert_eq!(retreat_depot(threat, &depots, 5.0).map(Depot::id), Some(&depot("North")));
    assert_eq!(retreat_depot(threat, &depots, 15.0).map(Depot::id), Some(&depot("East")));
    assert_eq!(retreat_depot(threat, &depots, 25.0).map(Depot::id), Some(&depot("East")));
    assert!(retreat_depot(threat, &DepotTable::new(), 5.0).is_none());
}
