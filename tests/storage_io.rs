use std::fs;
use tempfile::tempdir;
use wordle_plotter::models::TargetField;
use wordle_plotter::stats::error_table;
use wordle_plotter::{Error, storage};

const LOG: &str = "\
Person,Date,Time,Number of Guesses,Correct Letters Guess 1,Correct Letters Guess 2,Correct Letters Guess 3,Correct Letters Guess 4,Correct Letters Guess 5,Correct Letters Guess 6
Alice,13/01/2022,00:10:00,3,1,3,5,,,
Bob,13/01/2022,00:05:00,4,0,2,4,5,,
Alice,14/01/2022,00:08:00,2,2,5,,,,
";

#[test]
fn load_from_disk_tracks_persons_and_dates() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("log.csv");
    fs::write(&path, LOG).unwrap();

    let table = storage::load_csv(&path).unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table.distinct_persons(), ["Alice", "Bob"]);
    assert_eq!(table.distinct_dates().len(), 2);
    assert_eq!(TargetField::Time.value_of(&table.rows()[1]), 300.0);
}

#[test]
fn missing_columns_are_listed() {
    let data = "Person,Date,Time\nAlice,13/01/2022,00:10:00\n";
    match storage::read_csv(data.as_bytes()) {
        Err(Error::Schema { missing, found }) => {
            assert!(missing.contains(&"Number of Guesses".to_string()));
            assert!(missing.contains(&"Correct Letters Guess 6".to_string()));
            assert_eq!(found, ["Person", "Date", "Time"]);
        }
        other => panic!("expected a schema error, got {other:?}"),
    }
}

#[test]
fn malformed_date_is_a_format_error() {
    let data = LOG.replace("14/01/2022", "2022-01-14");
    match storage::read_csv(data.as_bytes()) {
        Err(Error::Format { row, column, .. }) => {
            assert_eq!(row, 3);
            assert_eq!(column, "Date");
        }
        other => panic!("expected a format error, got {other:?}"),
    }
}

#[test]
fn header_only_is_empty() {
    let header = LOG.lines().next().unwrap();
    assert!(matches!(
        storage::read_csv(header.as_bytes()),
        Err(Error::EmptyTable)
    ));
}

#[test]
fn error_table_round_trips_to_json() {
    let table = storage::read_csv(LOG.as_bytes()).unwrap();
    let rows = error_table(&table, None).unwrap();
    let dir = tempdir().unwrap();

    let csv_path = dir.path().join("errors.csv");
    storage::save_error_table_csv(&rows, &csv_path).unwrap();
    let csv_txt = fs::read_to_string(&csv_path).unwrap();
    assert!(csv_txt.starts_with("date,count,mean_time,"));
    assert_eq!(csv_txt.lines().count(), 1 + rows.len());

    let json_path = dir.path().join("errors.json");
    storage::save_error_table_json(&rows, &json_path).unwrap();
    let v: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    let arr = v.as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["count"], 2);
    assert_eq!(arr[0]["mean_guesses"], 3.5);
}
