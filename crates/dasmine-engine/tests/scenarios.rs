use dasmine_engine::*;
use dasmine_providers::{EventFilter, LineSource, SourceOptions};
use dasmine_testing::{DasEvent, SampleFiles, das_line};
use dasmine_types::{AnomalyKind, CompactTimestamp};

fn source(lines: Vec<String>) -> LineSource {
    LineSource::new(lines, SourceOptions::default())
}

fn ts(s: &str) -> Option<CompactTimestamp> {
    Some(s.parse().expect("valid compact timestamp"))
}

fn run_to_memory(source: &LineSource, options: &RunOptions) -> (RunSummary, MemorySink) {
    let mut sink = MemorySink::new();
    let summary = run(source, &mut sink, options).expect("run succeeds");
    (summary, sink)
}

#[test]
fn scenario_a_explicit_boundaries() {
    let src = source(vec![
        das_line(&[DasEvent::connect("1", "20240101090000")]),
        das_line(&[
            DasEvent::query("1", "20240101090100", "select a from t"),
            DasEvent::query("1", "20240101090200", "select b from t"),
        ]),
        das_line(&[DasEvent::disconnect("1", "20240101090300")]),
    ]);

    let tracked = build_session_map(&src, DuplicatePolicy::Event).unwrap();
    let window = tracked.sessions.get("1").unwrap();
    assert_eq!(window.start, ts("20240101090000"));
    assert_eq!(window.end, ts("20240101090300"));

    let (summary, sink) = run_to_memory(&src, &RunOptions::default());
    assert_eq!(summary.rows_written, 2);
    assert_eq!(sink.rows.len(), 3);
    for row in &sink.rows[1..] {
        assert_eq!(row[4], "20240101090000");
        assert_eq!(row[5], "20240101090300");
    }
    assert_eq!(sink.rows[1][9], "select a from t");
    assert_eq!(sink.rows[2][9], "select b from t");
}

#[test]
fn scenario_b_query_min_max() {
    let src = source(vec![das_line(&[
        DasEvent::query("2", "20240101090100", "q1"),
        DasEvent::query("2", "20240101090050", "q2"),
        DasEvent::query("2", "20240101090200", "q3"),
    ])]);

    let tracked = build_session_map(&src, DuplicatePolicy::Event).unwrap();
    let window = tracked.sessions.get("2").unwrap();
    assert_eq!(window.start, ts("20240101090050"));
    assert_eq!(window.end, ts("20240101090200"));

    let (_, sink) = run_to_memory(&src, &RunOptions::default());
    let sql: Vec<_> = sink.rows[1..].iter().map(|r| r[9].as_str()).collect();
    assert_eq!(sql, vec!["q1", "q2", "q3"], "rows keep input order");
}

#[test]
fn scenario_c_disconnect_only_session_has_no_rows() {
    let src = source(vec![
        das_line(&[DasEvent::disconnect("3", "20240101090300")]),
        das_line(&[DasEvent::connect("4", "20240101090000")]),
    ]);

    let tracked = build_session_map(&src, DuplicatePolicy::Event).unwrap();
    let window = tracked.sessions.get("3").unwrap();
    assert!(!window.is_known());
    assert!(tracked.sessions.known("3").is_none());

    let (summary, sink) = run_to_memory(&src, &RunOptions::default());
    assert_eq!(summary.rows_written, 0);
    assert_eq!(sink.rows.len(), 1, "header only");
    assert_eq!(summary.sessions, 2);
    assert_eq!(summary.known_sessions, 1);
}

#[test]
fn projection_against_foreign_map_counts_dropped_queries() {
    let boundaries_only = source(vec![das_line(&[DasEvent::disconnect("3", "20240101090300")])]);
    let tracked = build_session_map(&boundaries_only, DuplicatePolicy::Event).unwrap();

    let queries = source(vec![das_line(&[
        DasEvent::query("3", "20240101090100", "q"),
        DasEvent::query("99", "20240101090100", "q"),
    ])]);
    let mut sink = MemorySink::new();
    let stats = project(&queries, &tracked.sessions, &mut sink).unwrap();
    assert_eq!(stats.rows_written, 0);
    assert_eq!(stats.dropped_queries, 2);
    assert!(sink.rows.is_empty());
}

#[test]
fn scenario_d_duplicate_connect_keeps_first() {
    let src = source(vec![
        das_line(&[DasEvent::connect("5", "20240101090000")]),
        das_line(&[DasEvent::connect("5", "20240101093000")]),
        das_line(&[DasEvent::query("5", "20240101091000", "select 1")]),
    ]);

    let (summary, sink) = run_to_memory(&src, &RunOptions::default());
    assert_eq!(summary.anomalies.len(), 1);
    let anomaly = &summary.anomalies[0];
    assert_eq!(anomaly.kind, AnomalyKind::DuplicateConnect);
    assert_eq!(anomaly.session_id, "5");
    assert_eq!(Some(anomaly.retained.clone()), ts("20240101090000"));
    assert_eq!(Some(anomaly.ignored.clone()), ts("20240101093000"));
    assert_eq!(anomaly.line, 2);
    assert_eq!(sink.rows[1][4], "20240101090000");
}

#[test]
fn scenario_d_duplicate_disconnect_keeps_first() {
    let src = source(vec![das_line(&[
        DasEvent::connect("6", "20240101090000"),
        DasEvent::disconnect("6", "20240101090500"),
        DasEvent::disconnect("6", "20240101099000"),
    ])]);

    let tracked = build_session_map(&src, DuplicatePolicy::Event).unwrap();
    assert_eq!(tracked.sessions.get("6").unwrap().end, ts("20240101090500"));
    assert_eq!(tracked.anomalies[0].kind, AnomalyKind::DuplicateDisconnect);
}

#[test]
fn scenario_e_admin_user_is_invisible() {
    let lines = vec![das_line(&[
        DasEvent::connect("7", "20240101090000").user("rdsadmin"),
        DasEvent::query("7", "20240101090100", "select @@version").user("rdsadmin"),
        DasEvent::query("8", "20240101090100", "select 1"),
    ])];

    let excluded = source(lines.clone());
    let tracked = build_session_map(&excluded, DuplicatePolicy::Event).unwrap();
    assert!(tracked.sessions.get("7").is_none());
    let (summary, sink) = run_to_memory(&excluded, &RunOptions::default());
    assert_eq!(summary.rows_written, 1);
    assert!(sink.rows[1..].iter().all(|r| r[6] != "rdsadmin"));

    let included = LineSource::new(
        lines,
        SourceOptions {
            filter: EventFilter::keep_all(),
            ..SourceOptions::default()
        },
    );
    let (summary, _) = run_to_memory(&included, &RunOptions::default());
    assert_eq!(summary.rows_written, 2);
}

#[test]
fn scenario_e_custom_admin_user() {
    let lines = vec![das_line(&[
        DasEvent::query("7", "20240101090100", "select 1").user("dba"),
        DasEvent::query("8", "20240101090100", "select 1").user("rdsadmin"),
    ])];
    let src = LineSource::new(
        lines,
        SourceOptions {
            filter: EventFilter {
                skip_admin_user: true,
                admin_user: "dba".to_string(),
            },
            ..SourceOptions::default()
        },
    );
    let (_, sink) = run_to_memory(&src, &RunOptions::default());
    assert_eq!(sink.rows.len(), 2);
    assert_eq!(sink.rows[1][6], "rdsadmin");
}

// Duplicate handling scope: whether a duplicate CONNECT should also suppress
// boundary evidence later in the same raw record is the point to confirm with
// the log's operators. Both behaviors are pinned here.
#[test]
fn duplicate_in_record_event_policy_keeps_sibling_boundaries() {
    let src = source(vec![
        das_line(&[DasEvent::connect("9", "20240101090000")]),
        das_line(&[
            DasEvent::connect("9", "20240101090001"),
            DasEvent::disconnect("9", "20240101095000"),
            DasEvent::connect("10", "20240101091000"),
        ]),
        das_line(&[DasEvent::disconnect("10", "20240101092000")]),
    ]);

    let tracked = build_session_map(&src, DuplicatePolicy::Event).unwrap();
    assert_eq!(tracked.sessions.get("9").unwrap().end, ts("20240101095000"));
    assert_eq!(tracked.sessions.get("10").unwrap().start, ts("20240101091000"));
}

#[test]
fn duplicate_in_record_record_policy_drops_sibling_boundaries() {
    let src = source(vec![
        das_line(&[DasEvent::connect("9", "20240101090000")]),
        das_line(&[
            DasEvent::connect("9", "20240101090001"),
            DasEvent::disconnect("9", "20240101095000"),
            DasEvent::connect("10", "20240101091000"),
        ]),
        das_line(&[DasEvent::disconnect("10", "20240101092000")]),
    ]);

    let tracked = build_session_map(&src, DuplicatePolicy::Record).unwrap();
    assert_eq!(tracked.sessions.get("9").unwrap().end, None);
    let ten = tracked.sessions.get("10").unwrap();
    assert_eq!(ten.start, None, "sibling CONNECT was skipped");
    assert_eq!(ten.end, ts("20240101092000"), "next record scanned normally");
}

#[test]
fn queries_widen_explicit_window() {
    let src = source(vec![das_line(&[
        DasEvent::connect("11", "20240101090000"),
        DasEvent::query("11", "20240101085959", "early"),
        DasEvent::disconnect("11", "20240101090300"),
        DasEvent::query("11", "20240101090301", "late"),
    ])]);

    let tracked = build_session_map(&src, DuplicatePolicy::Event).unwrap();
    let window = tracked.sessions.get("11").unwrap();
    assert_eq!(window.start, ts("20240101085959"));
    assert_eq!(window.end, ts("20240101090301"));
}

#[test]
fn connect_without_disconnect_ends_at_last_query() {
    let src = source(vec![das_line(&[
        DasEvent::connect("12", "20240101090000"),
        DasEvent::query("12", "20240101090500", "q"),
        DasEvent::query("12", "20240101090400", "q"),
    ])]);
    let tracked = build_session_map(&src, DuplicatePolicy::Event).unwrap();
    let window = tracked.sessions.get("12").unwrap();
    assert_eq!(window.start, ts("20240101090000"));
    assert_eq!(window.end, ts("20240101090500"));
}

#[test]
fn disconnect_before_connect_in_file_order() {
    let src = source(vec![
        das_line(&[DasEvent::disconnect("13", "20240101090300")]),
        das_line(&[DasEvent::connect("13", "20240101090000")]),
        das_line(&[DasEvent::query("13", "20240101090100", "q")]),
    ]);
    let (summary, sink) = run_to_memory(&src, &RunOptions::default());
    assert!(summary.anomalies.is_empty());
    assert_eq!(sink.rows[1][4], "20240101090000");
    assert_eq!(sink.rows[1][5], "20240101090300");
}

#[test]
fn fatal_line_aborts_run_with_line_number() {
    let src = source(vec![
        das_line(&[DasEvent::connect("1", "20240101090000")]),
        das_line(&[DasEvent::query("1", "20240101090100", "q").without("logTime")]),
    ]);
    let mut sink = MemorySink::new();
    let err = run(&src, &mut sink, &RunOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Provider(_)));
    let message = err.to_string();
    assert!(message.contains("line 2"), "got: {}", message);
    assert!(message.contains("logTime"), "got: {}", message);
    assert!(sink.rows.is_empty(), "nothing written before the session map is complete");
}

#[test]
fn sample_log_end_to_end() {
    let src = dasmine_providers::FileSource::new(
        SampleFiles::new().path("aurora_mysql_das.jsonl"),
        SourceOptions::default(),
    );
    let mut sink = MemorySink::new();
    let summary = run(&src, &mut sink, &RunOptions::default()).unwrap();

    assert_eq!(summary.sessions, 4);
    assert_eq!(summary.known_sessions, 3);
    assert_eq!(summary.rows_written, 5);
    assert_eq!(summary.dropped_queries, 0);
    assert_eq!(summary.anomalies.len(), 1);

    let rows = &sink.rows[1..];
    let session_101: Vec<_> = rows.iter().filter(|r| r[2] == "101").collect();
    assert_eq!(session_101.len(), 2);
    assert!(session_101.iter().all(|r| r[4] == "20240305100000" && r[5] == "20240305100200"));

    let session_102: Vec<_> = rows.iter().filter(|r| r[2] == "102").collect();
    assert!(session_102.iter().all(|r| r[4] == "20240305100003" && r[5] == "20240305100007"));

    let session_104 = rows.iter().find(|r| r[2] == "104").unwrap();
    assert_eq!(session_104[4], "20240305100400");
    assert_eq!(session_104[5], "20240305100500");
    assert_eq!(session_104[8], "123456");
    assert_eq!(session_104[9], "SHOW TABLES");
}

#[test]
fn sample_log_record_policy() {
    let src = dasmine_providers::FileSource::new(
        SampleFiles::new().path("aurora_mysql_das.jsonl"),
        SourceOptions::default(),
    );
    let mut sink = MemorySink::new();
    let options = RunOptions {
        duplicate_policy: DuplicatePolicy::Record,
    };
    run(&src, &mut sink, &options).unwrap();

    let session_104 = sink.rows[1..].iter().find(|r| r[2] == "104").unwrap();
    assert_eq!(session_104[4], "20240305100400");
    assert_eq!(session_104[5], "20240305100410", "DISCONNECT after the duplicate is skipped");
}
