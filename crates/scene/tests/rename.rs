use autobind_scene::{
    AutoBinder, BindConfig, BoundValue, Host, NodeRenamer, NodeTree, SlotDecl, SlotTable,
    SlotType, TypeRegistry,
};
use pretty_assertions::assert_eq;

fn renamer() -> NodeRenamer {
    NodeRenamer::new(BindConfig::default())
}

#[test]
fn renames_bound_nodes_to_slot_names() {
    let mut tree = NodeTree::new("Player");
    let body = tree.add_child(tree.root(), "Body").unwrap();
    let child = tree.add_child(body, "GameObject (1)").unwrap();
    let gun = tree.add_capability(child, "Gun").unwrap();

    let table = SlotTable::new("PlayerView").with(SlotDecl::public("Weapon", SlotType::capability("Gun")));
    let mut host = Host::new(tree.root(), table);
    host.set("Weapon", Some(BoundValue::Capability(gun))).unwrap();

    let report = renamer().rename_to_match_slots(&mut tree, &host);

    assert_eq!(
        report.lines(),
        vec![
            "Player/Body/GameObject (1) -> Weapon",
            "total: 1 bound, 0 skipped"
        ]
    );
    assert_eq!(tree.name(child), "Weapon");
}

#[test]
fn host_node_is_never_renamed() {
    let mut tree = NodeTree::new("Player");
    let table = SlotTable::new("PlayerView")
        .with(SlotDecl::public("Root", SlotType::Node))
        .with(SlotDecl::public("Anchor", SlotType::Transform));
    let mut host = Host::new(tree.root(), table);
    host.set("Root", Some(BoundValue::Node(tree.root()))).unwrap();
    host.set("Anchor", Some(BoundValue::Transform(tree.root())))
        .unwrap();

    let report = renamer().rename_to_match_slots(&mut tree, &host);

    assert_eq!(
        report.lines(),
        vec![
            "Root skipped (self)",
            "Anchor skipped (self)",
            "total: 0 bound, 2 skipped"
        ]
    );
    assert_eq!(tree.name(tree.root()), "Player");
}

#[test]
fn unbound_and_ineligible_slots_untouched() {
    let mut tree = NodeTree::new("Player");
    let child = tree.add_child(tree.root(), "Thing").unwrap();

    let table = SlotTable::new("PlayerView")
        .with(SlotDecl::public("Empty", SlotType::Node))
        .with(SlotDecl::private("Secret", SlotType::Node));
    let mut host = Host::new(tree.root(), table);
    host.set("Secret", Some(BoundValue::Node(child))).unwrap();

    let report = renamer().rename_to_match_slots(&mut tree, &host);

    assert_eq!(
        report.lines(),
        vec!["Empty skipped (unbound)", "total: 0 bound, 1 skipped"]
    );
    assert_eq!(tree.name(child), "Thing");
    assert_eq!(host.value("Empty"), None);
}

#[test]
fn sibling_collisions_are_not_prevented() {
    let mut tree = NodeTree::new("Player");
    let a = tree.add_child(tree.root(), "A").unwrap();
    let b = tree.add_child(tree.root(), "Hand").unwrap();

    let table = SlotTable::new("PlayerView").with(SlotDecl::public("Hand", SlotType::Node));
    let mut host = Host::new(tree.root(), table);
    host.set("Hand", Some(BoundValue::Node(a))).unwrap();

    let report = renamer().rename_to_match_slots(&mut tree, &host);
    assert_eq!(report.bound_count(), 1);
    assert_eq!(tree.name(a), "Hand");
    assert_eq!(tree.name(b), "Hand");

    // The next bind pass now sees two candidates.
    let mut host = Host::new(tree.root(), host.table().clone());
    let report = AutoBinder::new(TypeRegistry::new(), BindConfig::default())
        .resolve(&tree, &mut host);
    assert_eq!(report.lines()[0], "Hand skipped (ambiguous)");
}

#[test]
fn rename_then_bind_round_trip() {
    let mut tree = NodeTree::new("Player");
    let child = tree.add_child(tree.root(), "Cube").unwrap();
    let light = tree.add_capability(child, "Light").unwrap();

    let table = SlotTable::new("PlayerView").with(SlotDecl::public("Lamp", SlotType::capability("Light")));
    let mut host = Host::new(tree.root(), table.clone());
    host.set("Lamp", Some(BoundValue::Capability(light))).unwrap();
    renamer().rename_to_match_slots(&mut tree, &host);

    let mut fresh = Host::new(tree.root(), table);
    let report = AutoBinder::new(TypeRegistry::new(), BindConfig::default())
        .resolve(&tree, &mut fresh);
    assert_eq!(report.lines()[0], "Player/Lamp -> Lamp");
    assert_eq!(fresh.value("Lamp"), Some(BoundValue::Capability(light)));
}
