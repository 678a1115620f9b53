//! End-to-end tests for the group-then-order pipeline used by search lists

use chrono::Utc;
use yoga_common::models::{search_sections, Asana, DataAsset};
use yoga_common::{group_by_creator, order_in_groups, GroupConfig, Grouped, SectionMarker};

fn asana(name: &str, created_by: Option<&str>) -> Asana {
    Asana {
        id: format!("id-{}", name),
        name: name.to_string(),
        sanskrit_name: None,
        alternative_names: Vec::new(),
        description: None,
        category: None,
        difficulty: "beginner".to_string(),
        per_side: false,
        image_url: None,
        created_by: created_by.map(str::to_string),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn render(entries: &[Grouped<&Asana>]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| match entry {
            Grouped::Section(marker) => format!("[{}]", marker.label()),
            Grouped::Item(asana) => asana.label().to_string(),
        })
        .collect()
}

fn config() -> GroupConfig {
    GroupConfig::new("My Poses", "Public Poses")
        .with_current_user(Some("user-123".into()), Some("me@example.com".into()))
        .with_alpha_users(["alpha"])
}

#[test]
fn test_full_pipeline_with_others() {
    let poses = vec![
        asana("Zebra Pose", Some("user-123")),
        asana("Warrior I", Some("alpha")),
        asana("Crow", Some("someone")),
        asana("apple pose", Some("me@example.com")),
        asana("Boat", Some("alpha")),
        asana("Ändern", None),
    ];
    let config = config().with_others_label("Community");

    let result = search_sections(&poses, &config);

    assert_eq!(
        render(&result),
        vec![
            "[My Poses]",
            "apple pose",
            "Zebra Pose",
            "[Public Poses]",
            "Boat",
            "Warrior I",
            "[Community]",
            "Ändern",
            "Crow",
        ]
    );
}

#[test]
fn test_pipeline_drops_unowned_without_others_label() {
    let poses = vec![asana("Crow", Some("someone")), asana("Boat", Some("alpha"))];

    let result = search_sections(&poses, &config());

    assert_eq!(render(&result), vec!["[Public Poses]", "Boat"]);
}

#[test]
fn test_pipeline_output_items_reference_inputs() {
    let poses = vec![
        asana("B", Some("user-123")),
        asana("A", Some("user-123")),
        asana("C", Some("alpha")),
    ];

    let result = search_sections(&poses, &config());

    for item in result.iter().filter_map(|e| e.as_item()) {
        assert!(poses.iter().any(|p| std::ptr::eq(p, *item)));
    }
}

#[test]
fn test_pipeline_dedups_repeated_reference() {
    let tree = asana("Tree", Some("user-123"));
    let refs = vec![&tree, &tree, &tree];

    let grouped = group_by_creator(refs, &config(), |a| a.created_by());
    let ordered = order_in_groups(&grouped, |a| a.label());

    assert_eq!(render(&ordered), vec!["[My Poses]", "Tree"]);
}

#[test]
fn test_section_order_independent_of_input_order() {
    let forward = vec![
        asana("Mine", Some("user-123")),
        asana("Pub", Some("alpha")),
        asana("Other", Some("x")),
    ];
    let mut backward = forward.clone();
    backward.reverse();
    let config = config().with_others_label("Others");

    let a = render(&search_sections(&forward, &config));
    let b = render(&search_sections(&backward, &config));

    assert_eq!(a, b);
    assert_eq!(a, vec!["[My Poses]", "Mine", "[Public Poses]", "Pub", "[Others]", "Other"]);
}

#[test]
fn test_handcrafted_sequence_with_orphans() {
    let z = asana("Zebra", None);
    let a = asana("Apple", None);
    let m = asana("mango", None);
    let input = vec![
        Grouped::Item(&z),
        Grouped::Item(&a),
        Grouped::Section(SectionMarker::new("Mine")),
        Grouped::Item(&z),
        Grouped::Item(&m),
        Grouped::Item(&a),
    ];

    let ordered = order_in_groups(&input, |p| p.label());

    assert_eq!(
        render(&ordered),
        vec!["Zebra", "Apple", "[Mine]", "Apple", "mango", "Zebra"]
    );
}

#[test]
fn test_grouped_json_shape() {
    let poses = vec![asana("Tree", Some("user-123"))];
    let result = search_sections(&poses, &config());

    let json = serde_json::to_value(&result).expect("Should serialize");
    assert_eq!(json[0], serde_json::json!({ "section": "My Poses" }));
    assert_eq!(json[1]["name"], "Tree");
    assert_eq!(json[1]["id"], "id-Tree");
}
