use pitch_metrics::mock_feed::mock_dataset;
use pitch_metrics::report::build_reports;
use pitch_metrics::report_export::export_reports;

#[test]
fn workbook_rows_match_reports() {
    let reports = build_reports(&mock_dataset(8, 2));
    let mut path = std::env::temp_dir();
    path.push(format!("pitch_metrics_export_{}.xlsx", std::process::id()));

    let summary = export_reports(&path, &reports).expect("export should succeed");
    assert_eq!(summary.matches, 2);
    assert_eq!(summary.team_rows, 4);
    assert_eq!(summary.player_rows, 44);
    let timeline: usize = reports.iter().map(|r| r.timeline.len()).sum();
    assert_eq!(summary.timeline_rows, timeline);

    let meta = std::fs::metadata(&path).expect("workbook written");
    assert!(meta.len() > 0);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn unwritable_path_is_an_error() {
    let reports = build_reports(&mock_dataset(8, 1));
    let mut path = std::env::temp_dir();
    path.push("pitch_metrics_missing_dir");
    path.push("nested");
    path.push("out.xlsx");
    let err = export_reports(&path, &reports).err().expect("missing directory");
    assert!(format!("{err:#}").contains("out.xlsx"));
}
