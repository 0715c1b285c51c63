use legis_score::config::{Config, InputConfig};
use legis_score::output::export::{csv_header, write_csv};
use legis_score::scoring::{
    score_table, validate_scoring, ScoreError, ScoreReport, ScoringConfig,
};
use legis_score::table::{read_table, TableError};

const SINGLE_AXIS_YAML: &str = r#"
scoring:
  indicators:
    - { name: a, axis: x }
  axes:
    - { name: x, label: Activity, log_variant: false }
"#;

fn scoring_from_yaml(yaml: &str) -> ScoringConfig {
    let config: Config = serde_saphyr::from_str(yaml).unwrap();
    let scoring = config.scoring.unwrap_or_default();
    validate_scoring(&scoring).unwrap();
    scoring
}

fn run(csv: &str, scoring: &ScoringConfig) -> ScoreReport {
    let table = read_table(
        csv.as_bytes(),
        &InputConfig::default(),
        &scoring.indicator_names(),
    )
    .unwrap();
    score_table(&table, scoring).unwrap()
}

fn legislature_57() -> String {
    let mut csv = String::from(
        "legislator_id,name,cohort,months_served,proj.relev.prot,cargos,req.fisc,align.voto,desv.voto\n",
    );
    let rows = [
        ("101", "Ana", 48, 4, 2, 10, 0.95, 0.05),
        ("102", "Bruno", 48, 0, 0, 3, 0.80, 0.20),
        ("103", "Carla", 24, 2, 1, 0, 0.60, 0.40),
        ("104", "Davi", 36, 9, 6, 25, 0.99, 0.01),
        ("105", "Elza", 12, 1, 0, 1, 0.70, 0.30),
        ("106", "Fabio", 48, 0, 3, 7, 0.85, 0.15),
    ];
    for (id, name, months, prot, cargos, fisc, align, desv) in rows {
        csv.push_str(&format!(
            "{id},{name},57,{months},{prot},{cargos},{fisc},{align},{desv}\n"
        ));
    }
    csv
}

#[test]
fn test_default_index_composite_is_mean_of_axes() {
    let scoring = ScoringConfig::default();
    let report = run(&legislature_57(), &scoring);
    assert_eq!(report.records.len(), 6);

    for record in &report.records {
        let n = record.axes.len() as f64;
        let linear: f64 = record.axes.iter().map(|a| a.linear).sum::<f64>() / n;
        let log: f64 = record
            .axes
            .iter()
            .map(|a| a.log.unwrap_or(a.linear))
            .sum::<f64>()
            / n;
        assert!((record.final_score - linear).abs() < 1e-9);
        assert!((record.final_score_log - log).abs() < 1e-9);
        assert!((1..=5).contains(&record.stars));

        let part = record.axes.iter().find(|a| a.name == "part").unwrap();
        assert!(part.log.is_none());
    }
}

#[test]
fn test_default_index_sorted_by_months() {
    let report = run(&legislature_57(), &ScoringConfig::default());
    let months: Vec<f64> = report.records.iter().map(|r| r.months_served).collect();
    assert_eq!(months, vec![48.0, 48.0, 48.0, 36.0, 24.0, 12.0]);
    // Ties keep input order
    let ids: Vec<&str> = report.records[..3]
        .iter()
        .map(|r| r.legislator_id.as_str())
        .collect();
    assert_eq!(ids, vec!["101", "102", "106"]);
}

#[test]
fn test_heavy_tail_class_scores() {
    let scoring = scoring_from_yaml(SINGLE_AXIS_YAML);
    let mut csv = String::from("legislator_id,cohort,months_served,a\n");
    for (i, v) in [0, 0, 5, 5, 5, 100].iter().enumerate() {
        csv.push_str(&format!("p{i},57,48,{v}\n"));
    }
    let report = run(&csv, &scoring);
    let classes: Vec<f64> = report
        .records
        .iter()
        .map(|r| r.indicators[0].class_score)
        .collect();
    assert_eq!(classes, vec![0.0, 0.0, 0.33, 0.33, 0.33, 1.0]);
}

#[test]
fn test_two_cohorts_are_independent() {
    let scoring = scoring_from_yaml(SINGLE_AXIS_YAML);
    let csv = "legislator_id,cohort,months_served,a\n\
               a1,56,48,1\n\
               a2,56,48,2\n\
               a3,56,48,3\n\
               b1,57,48,10\n\
               b2,57,48,20\n\
               b3,57,48,30\n";
    let report = run(csv, &scoring);

    let cohorts: Vec<u32> = report.records.iter().map(|r| r.cohort).collect();
    assert_eq!(cohorts, vec![57, 57, 57, 56, 56, 56]);
    let linear: Vec<f64> = report
        .records
        .iter()
        .map(|r| r.indicators[0].linear)
        .collect();
    assert_eq!(linear, vec![0.0, 0.5, 1.0, 0.0, 0.5, 1.0]);
    // Each cohort has its own 10.0 top scorer
    assert_eq!(report.records[2].stars, 5);
    assert_eq!(report.records[5].stars, 5);
}

#[test]
fn test_rank_policy_on_500_legislators() {
    let scoring = scoring_from_yaml(SINGLE_AXIS_YAML);
    let mut csv = String::from("legislator_id,cohort,months_served,a\n");
    for i in 0..500 {
        csv.push_str(&format!("p{i},57,48,{i}\n"));
    }
    let report = run(&csv, &scoring);

    let count = |n: u8| report.records.iter().filter(|r| r.stars == n).count();
    assert_eq!(count(5), 50);
    assert_eq!(count(4), 75);
    assert_eq!(count(3), 100);
    assert_eq!(count(2), 150);
    assert_eq!(count(1), 125);

    // A higher floor demotes part of the top tier. Ranking uses the published
    // two-decimal score, so p474 (9.499 -> 9.50) stays in the top tier.
    let strict = scoring_from_yaml(&format!(
        "{SINGLE_AXIS_YAML}  stars:\n    top_tier_floor: 9.5\n"
    ));
    let report = run(&csv, &strict);
    let five: Vec<&str> = report
        .records
        .iter()
        .filter(|r| r.stars == 5)
        .map(|r| r.legislator_id.as_str())
        .collect();
    assert_eq!(five.len(), 26);
    assert!(five.contains(&"p474"));
    assert!(!five.contains(&"p473"));
}

#[test]
fn test_interval_policy_from_config() {
    let scoring = scoring_from_yaml(&format!(
        "{SINGLE_AXIS_YAML}  stars:\n    policy: interval\n    basis: linear\n"
    ));
    let csv = "legislator_id,cohort,months_served,a\n\
               p1,57,48,0\n\
               p2,57,48,1\n\
               p3,57,48,2\n\
               p4,57,48,3\n\
               p5,57,48,4\n\
               p6,57,48,5\n";
    let report = run(csv, &scoring);
    let stars: Vec<u8> = report.records.iter().map(|r| r.stars).collect();
    assert_eq!(stars, vec![1, 1, 2, 3, 4, 5]);
}

#[test]
fn test_negative_count_fails_with_location() {
    let scoring = scoring_from_yaml(SINGLE_AXIS_YAML);
    let csv = "legislator_id,cohort,months_served,a\np1,57,48,3\np2,57,48,-1\n";
    let err = read_table(csv.as_bytes(), &InputConfig::default(), &scoring.indicator_names())
        .unwrap_err();
    assert!(matches!(err, TableError::Negative { row: 2, .. }));
    assert!(err.to_string().contains("'a'"));
}

#[test]
fn test_csv_export_matches_header() {
    let scoring = ScoringConfig::default();
    let report = run(&legislature_57(), &scoring);

    let mut out = Vec::new();
    write_csv(&mut out, &report.records, &scoring, 10.0).unwrap();
    let text = String::from_utf8(out).unwrap();
    let header_len = csv_header(&scoring).len();

    let mut reader = csv::Reader::from_reader(text.as_bytes());
    assert_eq!(reader.headers().unwrap().len(), header_len);
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 6);
    assert!(rows.iter().all(|r| r.len() == header_len));
    assert_eq!(&rows[0][0], "101");
}

#[test]
fn test_log_axis_with_unlogged_member_is_rejected() {
    let yaml = r#"
scoring:
  indicators:
    - { name: a, axis: x }
  axes:
    - { name: x }
"#;
    let config: Config = serde_saphyr::from_str(yaml).unwrap();
    let scoring = config.scoring.unwrap_or_default();
    let csv = "legislator_id,cohort,months_served,a\np1,57,48,1\np2,57,48,5\np3,57,48,9\n";
    let table = read_table(
        csv.as_bytes(),
        &InputConfig::default(),
        &scoring.indicator_names(),
    )
    .unwrap();

    let err = score_table(&table, &scoring).unwrap_err();
    assert!(matches!(err, ScoreError::Config(_)));
    assert!(err.to_string().contains("must be log-transformed"));
}

#[test]
fn test_tenure_error_uses_configured_column() {
    let scoring = scoring_from_yaml(SINGLE_AXIS_YAML);
    let input = InputConfig {
        tenure_column: "meses".to_string(),
        ..InputConfig::default()
    };
    let csv = "legislator_id,cohort,meses,a\np1,57,48,1\n";
    let mut table = read_table(csv.as_bytes(), &input, &scoring.indicator_names()).unwrap();
    table.rows[0].months_served = 0.0;

    let err = score_table(&table, &scoring).unwrap_err();
    assert!(matches!(err, ScoreError::Table(TableError::InvalidTenure { .. })));
    assert!(err.to_string().contains("'meses'"));
}
