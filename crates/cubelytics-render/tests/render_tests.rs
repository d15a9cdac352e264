use cubelytics_protocol::SourceResult;
use cubelytics_render::*;
use serde_json::json;

#[test]
fn test_faction_stats_row() {
    let tree = dispatch(
        "6b6t.org",
        &json!({"player_stats": {"Kills": {"7d": 5, "30d": 20, "total": 100}}}),
    );
    let Some(Section::Table(table)) = tree.find("Stats") else {
        panic!("expected stats table");
    };
    assert_eq!(table.rows, vec![vec!["Kills", "5", "20", "100"]]);
}

#[test]
fn test_tier_ranking_labels() {
    let tree = dispatch(
        "pvptiers.com",
        &json!({"rankings": {"sword": {"tier": 3, "pos": 12, "peak_tier": 1, "peak_pos": 2, "retired": false}}}),
    );
    assert_eq!(tree.field("tier"), Some("T3"));
    assert_eq!(tree.field("position"), Some("#12"));
    assert_eq!(tree.field("peak"), Some("T1 #2"));
    assert_eq!(tree.field("status"), Some("active"));
}

#[test]
fn test_timeout_failure_card() {
    let surface = assemble(&[
        SourceResult::success("mctiers.com", json!({"name": "Steve"})),
        SourceResult::failure("jartexnetwork.com", "timeout"),
    ]);
    let card = surface.card("source-1").expect("failure card");
    assert_eq!(card.status, CardStatus::Failed);
    assert_eq!(card.status.badge(), "Error");
    assert_eq!(card.body, CardBody::Warning("timeout".into()));
    assert_eq!(card.body.warning_line().as_deref(), Some("⚠ timeout"));

    let entry = &surface.nav[1];
    assert_eq!(entry.target, "source-1");
    assert_eq!(entry.status, CardStatus::Failed);
}

#[test]
fn test_label_variants_use_generic_rules() {
    let payload = json!({"rankings": {"sword": {"tier": 3}}});
    let known = dispatch("mctiers.com", &payload);
    let variant = dispatch("MCTIERS.COM", &payload);
    assert_eq!(known.field("tier"), Some("T3"));
    assert_eq!(variant.field("tier"), Some("3"));
    assert_eq!(variant, dispatch("example.org", &payload));
}

#[test]
fn test_rendering_is_idempotent() {
    let results = vec![
        SourceResult::success(
            "playhive.com",
            json!({"main": {"rank": "PLUS"}, "wars": {"xp": 10, "first_played": 1709596800000u64}}),
        ),
        SourceResult::success("hypixel (plancke)", json!({"status": "Online", "games": {}})),
        SourceResult::success("unknown", json!([1, 2, 3])),
        SourceResult::failure("6b6t.org", "HTTP 503"),
    ];
    assert_eq!(assemble(&results), assemble(&results));
}

#[test]
fn test_null_success_payload_renders_placeholder() {
    let surface = assemble(&[SourceResult::success("mcsrranked.com", serde_json::Value::Null)]);
    let CardBody::Tree(tree) = &surface.cards[0].body else {
        panic!("expected rendered tree");
    };
    assert!(tree.is_placeholder());
    assert_eq!(surface.cards[0].status.badge(), "OK");
}

#[test]
fn test_scroll_spy_single_active_entry() {
    let surface = assemble(&[
        SourceResult::success("a", json!({"x": 1})),
        SourceResult::success("b", json!({"y": 2})),
        SourceResult::success("c", json!({"z": 3})),
    ]);
    // Every card overlaps the band; only the first becomes active.
    let extents = vec![0..30, 5..30, 8..30];
    let mut spy = ScrollSpy::new();
    spy.observe(&extents, Viewport::new(0, 40));
    let active: Vec<usize> = (0..surface.nav.len()).filter(|i| spy.is_active(*i)).collect();
    assert_eq!(active, vec![0]);
}
