use std::fs;
use std::path::PathBuf;

use match_history::{normalize_history, Matchup};
use pandascore::parse_match_list;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn upcoming_keeps_only_two_sided_fixtures() {
    let raw = parse_match_list(&read_fixture("upcoming.json")).expect("fixture should parse");
    assert_eq!(raw.len(), 3);

    let records = normalize_history(&raw);
    assert_eq!(records.len(), 1);

    let matchup = Matchup::from_record(&records[0]);
    assert_eq!(matchup.match_id, Some(5001));
    assert_eq!(matchup.title(), "Natus Vincere vs FaZe");
    assert_eq!(matchup.league_name.as_deref(), Some("BLAST Premier"));
    assert_eq!(matchup.number_of_games, Some(3));
}

#[test]
fn upcoming_games_without_winner_are_not_countable() {
    let raw = parse_match_list(&read_fixture("upcoming.json")).unwrap();
    let records = normalize_history(&raw);
    assert_eq!(records[0].winner_id, None);
    assert!(records[0].games.iter().all(|g| !g.is_countable()));
}
