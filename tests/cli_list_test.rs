//! Integration tests for `roster list`, `roster options` and `roster show`.
//!
//! All tests read from the bundled fixture catalog through a `file://`
//! endpoint, so no network access is needed.

mod common;

use common::{TestEnv, ids};
use predicates::prelude::*;

const LUKE: &str = "cGVvcGxlOjE=";
const C3PO: &str = "cGVvcGxlOjI=";
const R2D2: &str = "cGVvcGxlOjM=";
const VADER: &str = "cGVvcGxlOjQ=";
const LEIA: &str = "cGVvcGxlOjU=";
const CHEWBACCA: &str = "cGVvcGxlOjEz";
const YODA: &str = "cGVvcGxlOjIw";

// === Paging ===

#[test]
fn test_list_first_page_holds_whole_catalog() {
    let env = TestEnv::new();
    let result = env.json(&["list"]);

    assert_eq!(result["count"], 7);
    assert_eq!(result["loaded"], 7);
    assert_eq!(result["total_count"], 7);
    assert_eq!(result["has_next_page"], false);
    assert_eq!(
        ids(&result),
        vec![LUKE, C3PO, R2D2, VADER, LEIA, CHEWBACCA, YODA]
    );
}

#[test]
fn test_list_pages_accumulate_in_order() {
    let env = TestEnv::new();

    let one = env.json(&["--page-size", "2", "list"]);
    assert_eq!(one["loaded"], 2);
    assert_eq!(one["has_next_page"], true);

    let two = env.json(&["--page-size", "2", "list", "--pages", "2"]);
    assert_eq!(ids(&two), vec![LUKE, C3PO, R2D2, VADER]);
    assert_eq!(two["has_next_page"], true);

    let all = env.json(&["--page-size", "2", "list", "--all"]);
    assert_eq!(all["loaded"], 7);
    assert_eq!(all["has_next_page"], false);
}

#[test]
fn test_list_page_size_from_env_and_config() {
    let env = TestEnv::new();
    env.write_config("page-size 3\n");

    let from_config = env.json(&["list"]);
    assert_eq!(from_config["loaded"], 3);

    let output = env
        .roster()
        .env("ROSTER_PAGE_SIZE", "5")
        .arg("list")
        .output()
        .unwrap();
    let from_env: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(from_env["loaded"], 5);

    let from_cli = env.json(&["--page-size", "1", "list"]);
    assert_eq!(from_cli["loaded"], 1);
}

#[test]
fn test_invalid_page_size_env_fails() {
    let env = TestEnv::new();
    env.roster()
        .env("ROSTER_PAGE_SIZE", "0")
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("ROSTER_PAGE_SIZE"));
}

#[test]
fn test_missing_fixture_is_fetch_error() {
    let env = TestEnv::new();
    env.roster_without_endpoint()
        .args(["--endpoint", "file:///definitely/not/here.json", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"error\""));
}

// === Filtering ===

#[test]
fn test_filter_single_facet() {
    let env = TestEnv::new();
    let result = env.json(&["list", "--gender", "male"]);
    assert_eq!(ids(&result), vec![LUKE, VADER, CHEWBACCA, YODA]);
}

#[test]
fn test_filter_values_within_facet_are_alternatives() {
    let env = TestEnv::new();
    let result = env.json(&["list", "--eye-color", "red", "--eye-color", "brown"]);
    assert_eq!(ids(&result), vec![R2D2, LEIA, YODA]);
}

#[test]
fn test_filter_facets_combine() {
    let env = TestEnv::new();
    let result = env.json(&["list", "--gender", "male", "--eye-color", "blue"]);
    assert_eq!(ids(&result), vec![LUKE, CHEWBACCA]);
}

#[test]
fn test_filter_multi_valued_film() {
    let env = TestEnv::new();
    let result = env.json(&["list", "--film", "Return of the Jedi"]);
    assert_eq!(ids(&result), vec![LUKE, R2D2, LEIA, YODA]);
}

#[test]
fn test_filter_sentinel_never_matches() {
    let env = TestEnv::new();
    let result = env.json(&["list", "--gender", "n/a"]);
    assert_eq!(result["count"], 0);
}

#[test]
fn test_filter_only_sees_loaded_pages() {
    let env = TestEnv::new();
    let result = env.json(&["--page-size", "2", "list", "--gender", "male"]);
    assert_eq!(ids(&result), vec![LUKE]);
}

#[test]
fn test_list_human_output() {
    let env = TestEnv::new();
    env.roster()
        .args(["-H", "--page-size", "2", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 character(s) match (2 loaded of 7, more available)"))
        .stdout(predicate::str::contains("Luke Skywalker"));
}

// === Options ===

#[test]
fn test_options_first_observed_order_without_sentinel() {
    let env = TestEnv::new();

    let gender = env.json(&["options", "gender"]);
    assert_eq!(gender["label"], "Gender");
    assert_eq!(gender["options"], serde_json::json!(["male", "female"]));

    let species = env.json(&["options", "species"]);
    assert_eq!(
        species["options"],
        serde_json::json!(["Droid", "Wookie", "Yoda's species"])
    );

    let films = env.json(&["options", "film"]);
    assert_eq!(
        films["options"],
        serde_json::json!(["A New Hope", "The Empire Strikes Back", "Return of the Jedi"])
    );
}

#[test]
fn test_options_unknown_facet_fails() {
    let env = TestEnv::new();
    env.roster()
        .args(["options", "hair-color"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown filter facet: hair-color"));
}

// === Show ===

#[test]
fn test_show_character() {
    let env = TestEnv::new();
    let result = env.json(&["show", LEIA]);
    assert_eq!(result["name"], "Leia Organa");
    assert_eq!(result["homeworld"]["name"], "Alderaan");
    assert_eq!(result["favorite"], false);
}

#[test]
fn test_show_human_uses_placeholders() {
    let env = TestEnv::new();
    env.roster()
        .args(["-H", "show", C3PO])
        .assert()
        .success()
        .stdout(predicate::str::contains("C-3PO"))
        .stdout(predicate::str::contains("Gender:    -"))
        .stdout(predicate::str::contains("Species:   Droid"))
        .stdout(predicate::str::contains("- The Empire Strikes Back"));
}

#[test]
fn test_show_skips_null_films() {
    let env = TestEnv::new();
    env.roster()
        .args(["-H", "show", LEIA])
        .assert()
        .success()
        .stdout(predicate::str::contains("- A New Hope"))
        .stdout(predicate::str::contains("- Return of the Jedi"));
}

#[test]
fn test_show_unknown_id_fails() {
    let env = TestEnv::new();
    env.roster()
        .args(["-H", "show", "nobody"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Character not found: nobody"));
}
