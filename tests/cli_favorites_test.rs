//! Integration tests for `roster fav` and `roster list --favorites-only`.

mod common;

use common::{TestEnv, ids};
use predicates::prelude::*;

const LUKE: &str = "cGVvcGxlOjE=";
const R2D2: &str = "cGVvcGxlOjM=";
const YODA: &str = "cGVvcGxlOjIw";

#[test]
fn test_toggle_adds_and_persists() {
    let env = TestEnv::new();

    let result = env.json(&["fav", "toggle", LUKE]);
    assert_eq!(result["favorite"], true);
    assert_eq!(result["name"], "Luke Skywalker");
    assert_eq!(result["count"], 1);
    assert!(env.favorites_path().exists());

    let listed = env.json(&["fav", "list"]);
    assert_eq!(listed["count"], 1);
    assert_eq!(listed["favorites"][0]["id"], LUKE);
    assert_eq!(listed["favorites"][0]["homeworld"]["name"], "Tatooine");
}

#[test]
fn test_toggle_twice_removes() {
    let env = TestEnv::new();
    env.json(&["fav", "toggle", R2D2]);

    let result = env.json(&["fav", "toggle", R2D2]);
    assert_eq!(result["favorite"], false);
    assert_eq!(result["count"], 0);

    let listed = env.json(&["fav", "list"]);
    assert_eq!(listed["count"], 0);
}

#[test]
fn test_toggle_keeps_insertion_order() {
    let env = TestEnv::new();
    env.json(&["fav", "toggle", YODA]);
    env.json(&["fav", "toggle", LUKE]);

    let listed = env.json(&["fav", "list"]);
    let order: Vec<&str> = listed["favorites"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap())
        .collect();
    assert_eq!(order, vec![YODA, LUKE]);
}

#[test]
fn test_toggle_human_output() {
    let env = TestEnv::new();
    env.roster()
        .args(["-H", "fav", "toggle", LUKE])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Added Luke Skywalker [cGVvcGxlOjE=] to favorites (1 total)",
        ));
    env.roster()
        .args(["-H", "fav", "toggle", LUKE])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed Luke Skywalker"));
}

#[test]
fn test_toggle_unknown_id_fails() {
    let env = TestEnv::new();
    env.roster()
        .args(["fav", "toggle", "nobody"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Character not found"));
    assert!(!env.favorites_path().exists());
}

#[test]
fn test_favorites_only_list_ignores_catalog() {
    let env = TestEnv::new();
    env.json(&["fav", "toggle", YODA]);
    env.json(&["fav", "toggle", LUKE]);

    let result = env.json(&["list", "--favorites-only"]);
    assert_eq!(result["favorites_only"], true);
    assert_eq!(ids(&result), vec![YODA, LUKE]);
    assert!(
        result["characters"]
            .as_array()
            .unwrap()
            .iter()
            .all(|c| c["favorite"] == true)
    );

    let filtered = env.json(&["list", "--favorites-only", "--eye-color", "blue"]);
    assert_eq!(ids(&filtered), vec![LUKE]);
}

#[test]
fn test_list_marks_favorites() {
    let env = TestEnv::new();
    env.json(&["fav", "toggle", R2D2]);

    let result = env.json(&["list"]);
    let r2 = result["characters"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["id"] == R2D2)
        .unwrap();
    assert_eq!(r2["favorite"], true);
    assert_eq!(result["characters"][0]["favorite"], false);
}

#[test]
fn test_favorites_survive_without_endpoint() {
    let env = TestEnv::new();
    env.json(&["fav", "toggle", LUKE]);

    // Favorites carry their own snapshot; listing them never opens the catalog.
    env.roster_without_endpoint()
        .args(["--endpoint", "file:///definitely/not/here.json", "fav", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains(LUKE));
}

#[test]
fn test_fav_clear() {
    let env = TestEnv::new();
    env.json(&["fav", "toggle", LUKE]);
    env.json(&["fav", "toggle", R2D2]);

    let cleared = env.json(&["fav", "clear"]);
    assert_eq!(cleared["removed"], 2);

    let listed = env.json(&["fav", "list"]);
    assert_eq!(listed["count"], 0);
}

#[test]
fn test_malformed_favorites_treated_as_empty() {
    let env = TestEnv::new();
    std::fs::write(env.favorites_path(), "{ definitely not a list").unwrap();

    let listed = env.json(&["fav", "list"]);
    assert_eq!(listed["count"], 0);

    // The next mutation overwrites the broken file.
    env.json(&["fav", "toggle", LUKE]);
    let raw = std::fs::read_to_string(env.favorites_path()).unwrap();
    let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored[0]["id"], LUKE);
}

#[test]
fn test_status_counts_favorites() {
    let env = TestEnv::new();
    env.json(&["fav", "toggle", LUKE]);

    let status = env.json(&[]);
    assert_eq!(status["favorites"], 1);
}
