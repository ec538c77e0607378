mod util;

use std::collections::BTreeSet;
use tcad_mesh::io::resolver::RegionHandle;
use tcad_mesh::io::tdr::{ReadOptions, TdrFile};
use util::{TrackedStore, device_store, open_device};

fn set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn region_names_are_deduplicated() {
    let file = open_device();
    assert_eq!(
        file.region_names().unwrap(),
        &set(&["Contact", "Oxide", "Silicon"])
    );
}

#[test]
fn field_names_come_from_quantities() {
    let file = open_device();
    assert_eq!(
        file.field_names().unwrap(),
        &set(&["ElectrostaticPotential", "eDensity"])
    );
}

#[test]
fn resolve_region_returns_first_match() {
    let file = open_device();
    let oxide = file.resolve_region("Oxide").unwrap().unwrap();
    assert_eq!(
        oxide,
        RegionHandle {
            key: 1,
            name: "Oxide".into(),
            path: "collection/geometry_0/region_1".into(),
        }
    );
    assert_eq!(oxide.elements_path(), "collection/geometry_0/region_1/elements_0");
}

#[test]
fn resolve_region_is_case_sensitive_and_absent_is_none() {
    let file = open_device();
    assert!(file.resolve_region("silicon").unwrap().is_none());
    assert!(file.resolve_region("Nitride").unwrap().is_none());
}

#[test]
fn resolve_field_matches_region_and_quantity() {
    let file = open_device();
    let handle = file
        .resolve_field_for_region(1, "ElectrostaticPotential")
        .unwrap()
        .unwrap();
    assert_eq!(handle.region_key, 1);
    assert_eq!(handle.values_path(), format!("{}/values", handle.path));

    assert!(file.resolve_field_for_region(3, "eDensity").unwrap().is_none());
    assert!(file.resolve_field_for_region(0, "hDensity").unwrap().is_none());
}

#[test]
fn repeated_lookups_are_stable() {
    let file = open_device();
    let a = file.resolve_region("Silicon").unwrap();
    let b = file.resolve_region("Silicon").unwrap();
    assert_eq!(a, b);
    let names = file.region_names().unwrap() as *const _;
    assert!(std::ptr::eq(names, file.region_names().unwrap()));
}

#[test]
fn region_field_names_lists_quantities_per_region() {
    let file = open_device();
    assert_eq!(
        file.region_field_names("Silicon").unwrap(),
        set(&["ElectrostaticPotential", "eDensity"])
    );
    assert_eq!(
        file.region_field_names("Contact").unwrap(),
        set(&["ElectrostaticPotential"])
    );
    assert!(file.region_field_names("Nitride").unwrap().is_empty());
}

#[test]
fn undecodable_region_name_only_hides_that_region() {
    let (store, _) = TrackedStore::new(device_store());
    let store = store.break_attr("collection/geometry_0/region_1", "name");
    let mut file = TdrFile::from_store("device.mem", store, ReadOptions::default()).unwrap();

    assert_eq!(
        file.region_names().unwrap(),
        &set(&["Contact", "Oxide", "Silicon"])
    );
    // the next region carrying the name takes over
    assert_eq!(file.resolve_region("Oxide").unwrap().unwrap().key, 3);

    let silicon = file
        .get("Silicon", Some("ElectrostaticPotential"))
        .unwrap()
        .unwrap();
    assert_eq!(
        silicon.field.as_ref().unwrap().values,
        vec![0.0, 0.1, 0.2, 0.3]
    );

    let all = file.get_all(None, None).unwrap();
    assert_eq!(all.keys().cloned().collect::<Vec<_>>(), vec!["Silicon"]);
    assert_eq!(all["Silicon"].len(), 2);
}

#[test]
fn undecodable_quantity_only_hides_that_dataset() {
    let (store, _) = TrackedStore::new(device_store());
    let store = store.break_attr("collection/geometry_0/state_0/dataset_1", "quantity");
    let file = TdrFile::from_store("device.mem", store, ReadOptions::default()).unwrap();

    assert_eq!(
        file.region_field_names("Silicon").unwrap(),
        set(&["ElectrostaticPotential"])
    );
    assert!(file.resolve_field_for_region(0, "eDensity").unwrap().is_none());
    assert!(file.resolve_field_for_region(1, "eDensity").unwrap().is_some());
}
