use rollcall_core::{normalize_phone, VerdictLabels};
use rollcall_match::{
    load_status_set, reconcile_file, roster_coverage_file, MatchError, RosterSpec, StatusSet,
    StatusSource,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn roster_spec() -> RosterSpec {
    RosterSpec {
        phone_column: "phone2".to_string(),
        verdict_column: "WA".to_string(),
        labels: VerdictLabels::default(),
    }
}

fn read_rows(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .expect("open output");
    reader
        .records()
        .map(|record| {
            record
                .expect("record")
                .iter()
                .map(str::to_string)
                .collect()
        })
        .collect()
}

#[test]
fn annotates_roster_from_status_export() {
    let temp = TempDir::new().expect("tempdir");
    let status_path = temp.path().join("results.csv");
    let roster_path = temp.path().join("contacts_merged.csv");
    let out_path = temp.path().join("out").join("numb1.csv");

    fs::write(
        &status_path,
        "Проверка номеров\nТелефон,WhatsApp\n+79161234567,ДА\n+79165554433,НЕТ\n",
    )
    .expect("write status");
    fs::write(
        &roster_path,
        "name,phone2,email\nAda,89161234567,ada@example.com\nBob,123,bob@example.com\nEve,8 916 555 44 33,\n",
    )
    .expect("write roster");

    let loaded = load_status_set(&status_path, &StatusSource::new("ДА")).expect("status set");
    assert_eq!(loaded.set.len(), 1);

    let stats =
        reconcile_file(&roster_path, &out_path, &roster_spec(), &loaded.set).expect("reconcile");
    assert_eq!(stats.processed, 3);
    assert_eq!(stats.positive, 1);
    assert_eq!(stats.negative, 2);

    let rows = read_rows(&out_path);
    assert_eq!(rows[0], vec!["name", "phone2", "email", "WA"]);
    assert_eq!(rows[1], vec!["Ada", "89161234567", "ada@example.com", "есть ватсап"]);
    assert_eq!(rows[2][3], "нету");
    assert_eq!(rows[3][3], "нету");
    assert!(!temp.path().join("out").join(".numb1.csv.partial").exists());
}

#[test]
fn preserves_roster_order_over_mixed_verdicts() {
    let temp = TempDir::new().expect("tempdir");
    let status_path = temp.path().join("results.csv");
    let roster_path = temp.path().join("roster.csv");
    let out_path = temp.path().join("annotated.csv");

    let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = move || {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        seed
    };

    let mut status = String::from("phone,status\n");
    let mut roster = String::from("id,phone2\n");
    let mut expected = Vec::new();
    for idx in 0..150u32 {
        let subscriber = format!("916{:07}", idx);
        let roll = next() % 3;
        match roll {
            0 => status.push_str(&format!("8{subscriber},да\n")),
            1 => status.push_str(&format!("8{subscriber},нет\n")),
            _ => {}
        }
        let rendered = if next() % 2 == 0 {
            format!("+7 {subscriber}")
        } else {
            format!("8-{subscriber}")
        };
        roster.push_str(&format!("row-{idx},{rendered}\n"));
        expected.push((format!("row-{idx}"), roll == 0));
    }
    assert!(expected.iter().any(|(_, positive)| *positive));
    assert!(expected.iter().any(|(_, positive)| !*positive));

    fs::write(&status_path, status).expect("write status");
    fs::write(&roster_path, roster).expect("write roster");

    let loaded = load_status_set(&status_path, &StatusSource::new("ДА")).expect("status set");
    let stats =
        reconcile_file(&roster_path, &out_path, &roster_spec(), &loaded.set).expect("reconcile");
    assert_eq!(stats.processed, 150);

    let rows = read_rows(&out_path);
    assert_eq!(rows.len(), 151);
    for (row, (id, positive)) in rows[1..].iter().zip(&expected) {
        assert_eq!(&row[0], id);
        let label = if *positive { "есть ватсап" } else { "нету" };
        assert_eq!(row[2], label, "row {id}");
    }
}

#[test]
fn missing_datasets_abort() {
    let temp = TempDir::new().expect("tempdir");
    let missing = temp.path().join("results.csv");
    let err = load_status_set(&missing, &StatusSource::new("ДА")).unwrap_err();
    assert!(matches!(err, MatchError::MissingDataset(_)));

    let out_path = temp.path().join("out.csv");
    let set: StatusSet = [normalize_phone("89161234567").expect("phone")]
        .into_iter()
        .collect();
    let err = reconcile_file(&missing, &out_path, &roster_spec(), &set).unwrap_err();
    assert!(matches!(err, MatchError::MissingDataset(_)));
    assert!(!out_path.exists());
}

#[test]
fn schema_mismatch_writes_nothing() {
    let temp = TempDir::new().expect("tempdir");
    let roster_path = temp.path().join("roster.csv");
    let out_path = temp.path().join("out.csv");
    fs::write(&roster_path, "name,phone\nAda,89161234567\n").expect("write roster");

    let err = reconcile_file(&roster_path, &out_path, &roster_spec(), &StatusSet::new())
        .unwrap_err();
    assert!(matches!(err, MatchError::MissingRosterField { .. }));
    assert!(!out_path.exists());
}

#[test]
fn refuses_to_overwrite_the_roster() {
    let temp = TempDir::new().expect("tempdir");
    let roster_path = temp.path().join("roster.csv");
    fs::write(&roster_path, "phone2\n89161234567\n").expect("write roster");

    let err = reconcile_file(&roster_path, &roster_path, &roster_spec(), &StatusSet::new())
        .unwrap_err();
    assert!(matches!(err, MatchError::InvalidOutputPath(_)));
    assert_eq!(
        fs::read_to_string(&roster_path).expect("read roster"),
        "phone2\n89161234567\n"
    );
}

#[test]
fn coverage_reads_roster_file() {
    let temp = TempDir::new().expect("tempdir");
    let roster_path = temp.path().join("roster.csv");
    fs::write(&roster_path, "phone2\n89161234567\n89167654321\n").expect("write roster");
    let set: StatusSet = [normalize_phone("+79161234567").expect("phone")]
        .into_iter()
        .collect();

    let coverage = roster_coverage_file(&roster_path, "phone2", &set, 500, 10).expect("coverage");
    assert_eq!(coverage.roster_rows, 2);
    assert_eq!(coverage.found, 1);
    assert!(coverage.missing_examples.is_empty());
}

#[test]
fn failed_rename_removes_partial_output() {
    let temp = TempDir::new().expect("tempdir");
    let roster_path = temp.path().join("roster.csv");
    fs::write(&roster_path, "phone2\n89161234567\n").expect("write roster");
    let out_path = temp.path().join("out");
    fs::create_dir(&out_path).expect("create dir");
    fs::write(out_path.join("keep.txt"), "keep").expect("write file");

    let err = reconcile_file(&roster_path, &out_path, &roster_spec(), &StatusSet::new())
        .unwrap_err();
    assert!(matches!(err, MatchError::Io(_)));
    assert!(!temp.path().join(".out.partial").exists());
    assert!(out_path.join("keep.txt").exists());
}
