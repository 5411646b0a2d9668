//! End-to-end coverage of the Driver running real sequences against the
//! in-memory bus, exercising the scenarios the unit tests only see in parts.

use dali_protocol::address::GearAddress;
use dali_protocol::codec::Command;
use dali_protocol::command::GearCommand;
use dali_protocol::driver::{Driver, DriverConfig};
use dali_protocol::response::Response;
use dali_protocol::sequences::commissioning::GearCommissioning;
use dali_protocol::sequences::query_device_types::QueryDeviceTypes;
use dali_protocol::transport::mock::{FakeGear, MockBus};

fn driver(gear: Vec<FakeGear>) -> Driver<MockBus> {
    Driver::new(MockBus::new(gear), DriverConfig::default())
}

#[tokio::test]
async fn commissions_two_unaddressed_gear_without_collision() {
    let gear = vec![
        FakeGear::new(None).with_random_preload(0x00_1111),
        FakeGear::new(None).with_random_preload(0x00_2222),
    ];
    let driver = driver(gear);
    let assigned = driver.run_sequence(GearCommissioning::new(false, false), None).await.unwrap();
    assert_eq!(assigned, vec![0, 1]);
}

#[tokio::test]
async fn collision_on_shared_random_address_restarts_and_resolves() {
    let gear_a =
        FakeGear::new(None).with_random_preload(0x00_aa0000).with_random_preload(0x00_1111);
    let gear_b =
        FakeGear::new(None).with_random_preload(0x00_aa0000).with_random_preload(0x00_2222);
    let driver = driver(vec![gear_a, gear_b]);
    let mut restarts = 0;
    let mut on_progress = |report: dali_protocol::ProgressReport| {
        if report.message.contains("collision") {
            restarts += 1;
        }
    };
    let assigned = driver
        .run_sequence(GearCommissioning::new(false, false), Some(&mut on_progress))
        .await
        .unwrap();
    assert_eq!(assigned, vec![0, 1]);
    assert!(restarts >= 1);
}

#[tokio::test]
async fn dry_run_commissioning_assigns_no_addresses() {
    let gear = vec![FakeGear::new(None).with_random_preload(0x00_3333)];
    let driver = driver(gear);
    let assigned = driver.run_sequence(GearCommissioning::new(false, true), None).await.unwrap();
    assert!(assigned.is_empty());
}

#[tokio::test]
async fn query_device_types_reports_single_type() {
    let gear = FakeGear::new(Some(5)).with_device_type(6);
    let driver = driver(vec![gear]);
    let types = driver
        .run_sequence(QueryDeviceTypes::new(GearAddress::Short(5)), None)
        .await
        .unwrap();
    assert_eq!(types, vec![6]);
}

#[tokio::test]
async fn reports_progress_during_commissioning() {
    let gear = vec![FakeGear::new(None).with_random_preload(0x00_4444)];
    let driver = driver(gear);
    let mut ticks = 0;
    let mut on_progress = |_report| ticks += 1;
    let assigned = driver
        .run_sequence(GearCommissioning::new(false, false), Some(&mut on_progress))
        .await
        .unwrap();
    assert_eq!(assigned, vec![0]);
    assert!(ticks > 0);
}

#[tokio::test]
async fn send_and_run_sequence_serialize_through_the_same_driver() {
    let driver = driver(vec![FakeGear::new(Some(2))]);
    let present = driver
        .send(Command::Gear(GearCommand::QueryControlGearPresent(GearAddress::Short(2))))
        .await
        .unwrap();
    assert_eq!(present, Response::YesNo(true));

    let types = driver
        .run_sequence(QueryDeviceTypes::new(GearAddress::Short(2)), None)
        .await
        .unwrap();
    assert_eq!(types, vec![0]);
}
