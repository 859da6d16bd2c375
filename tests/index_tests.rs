mod common;

use common::{index_with, ProfileBuilder};
use perf_heatmap::{FunctionKey, HeatLevel, Index, IndexConfig, IndexError, LineStats};
use pretty_assertions::assert_eq;

fn main_key(function: &str, file: &str) -> FunctionKey {
    FunctionKey::new("main", "", function, file)
}

fn collect_lines(index: &Index) -> Vec<(String, LineStats)> {
    let mut out = Vec::new();
    index.inspect(|record| out.push((record.func.key.to_string(), record.stats)));
    out
}

#[test]
fn test_samples_on_same_line_are_summed() {
    let profile = ProfileBuilder::new()
        .sample(25, &[("main.work", "/src/main.go", 10)])
        .sample(75, &[("main.work", "/src/main.go", 10)])
        .build();
    let index = index_with(0.25, &profile);

    assert_eq!(index.num_points(), 1);
    let stats = index.query_line(&main_key("work", "main.go"), 10);
    assert_eq!(stats.value, 100);
    assert_eq!(stats.flat_value, 100);
    assert_eq!(stats.heat_level(), HeatLevel::new(5, 5));
}

#[test]
fn test_global_levels_across_single_line_functions() {
    let mut builder = ProfileBuilder::new();
    for (i, value) in [109, 108, 107, 106, 105].into_iter().enumerate() {
        let name = format!("main.f{}", i);
        builder = builder.sample(value, &[(name.as_str(), "/src/main.go", 10 + i as i64)]);
    }
    let index = index_with(1.0, &builder.build());

    let levels: Vec<HeatLevel> = (0..5)
        .map(|i| index.query_func(&main_key(&format!("f{}", i), "main.go")))
        .collect();
    assert_eq!(
        levels,
        vec![
            HeatLevel::new(5, 5),
            HeatLevel::new(5, 4),
            HeatLevel::new(5, 3),
            HeatLevel::new(5, 2),
            HeatLevel::new(5, 1),
        ]
    );
}

#[test]
fn test_ten_lines_two_per_level() {
    let mut builder = ProfileBuilder::new();
    for i in 0..10 {
        builder = builder.sample(1000 - i * 10, &[("main.loop", "/src/main.go", 100 + i)]);
    }
    let index = index_with(1.0, &builder.build());
    let key = main_key("loop", "main.go");

    let mut counts = [0usize; 6];
    index.query_line_range(&key, 0, u32::MAX, |stats| {
        counts[stats.local_level as usize] += 1;
        true
    });
    assert_eq!(counts, [0, 2, 2, 2, 2, 2]);

    // Hottest two lines come first in the file.
    assert_eq!(index.query_line(&key, 100).local_level, 5);
    assert_eq!(index.query_line(&key, 101).local_level, 5);
    assert_eq!(index.query_line(&key, 109).local_level, 1);
}

#[test]
fn test_unknown_lookups_return_zero() {
    let profile = ProfileBuilder::new()
        .sample(10, &[("main.work", "/src/main.go", 10)])
        .sample(20, &[("main.work", "/src/main.go", 20)])
        .build();
    let index = index_with(0.5, &profile);
    let key = main_key("work", "main.go");

    assert!(!index.has_file("/src/other.go"));
    let mut visited = 0;
    index.inspect_file("/src/other.go", |_| visited += 1);
    assert_eq!(visited, 0);

    assert_eq!(index.query_func(&main_key("missing", "main.go")), HeatLevel::default());
    assert_eq!(index.query_line(&main_key("missing", "main.go"), 10), LineStats::default());

    assert_eq!(index.query_line(&key, 5), LineStats::default());
    assert_eq!(index.query_line(&key, 15), LineStats::default());
    assert_eq!(index.query_line(&key, 25), LineStats::default());

    index.query_line_range(&key, 21, 30, |_| {
        visited += 1;
        true
    });
    assert_eq!(visited, 0);
}

#[test]
fn test_second_add_profile_is_rejected() {
    let first = ProfileBuilder::new()
        .sample(10, &[("main.a", "/src/main.go", 1)])
        .sample(30, &[("main.a", "/src/main.go", 2)])
        .build();
    let second = ProfileBuilder::new()
        .sample(99, &[("main.b", "/src/main.go", 7)])
        .build();

    let mut index = Index::new(IndexConfig::new().with_threshold(1.0)).unwrap();
    index.add_profile(&first).unwrap();
    let before = collect_lines(&index);
    let memory_before = index.memory_usage_approx();

    assert_eq!(index.add_profile(&second), Err(IndexError::AlreadyPopulated));
    assert_eq!(collect_lines(&index), before);
    assert_eq!(index.memory_usage_approx(), memory_before);
    assert_eq!(index.query_func(&main_key("b", "main.go")), HeatLevel::default());
}

#[test]
fn test_failed_add_leaves_index_empty() {
    let mut index = Index::new(IndexConfig::default()).unwrap();
    let empty = ProfileBuilder::new().build();

    assert_eq!(index.add_profile(&empty), Err(IndexError::NoSamples));
    assert!(!index.is_populated());
    assert_eq!(index.memory_usage_approx(), 0);

    // Still accepts a good profile afterwards.
    let profile = ProfileBuilder::new()
        .sample(10, &[("main.a", "/src/main.go", 1)])
        .build();
    index.add_profile(&profile).unwrap();
    assert!(index.is_populated());
}

#[test]
fn test_flat_and_cumulative_values() {
    let profile = ProfileBuilder::new()
        .sample(
            40,
            &[
                ("main.inner", "/src/main.go", 30),
                ("main.outer", "/src/main.go", 12),
            ],
        )
        .sample(60, &[("main.outer", "/src/main.go", 12)])
        .build();
    let index = index_with(1.0, &profile);

    let outer = index.query_line(&main_key("outer", "main.go"), 12);
    assert_eq!(outer.value, 100);
    assert_eq!(outer.flat_value, 60);

    let inner = index.query_line(&main_key("inner", "main.go"), 30);
    assert_eq!(inner.value, 40);
    assert_eq!(inner.flat_value, 40);
}

#[test]
fn test_methods_and_closures_share_a_key() {
    let profile = ProfileBuilder::new()
        .sample(10, &[("example.com/app/server.(*Server).Serve", "/src/server.go", 40)])
        .sample(20, &[("example.com/app/server.(*Server).Serve.func1", "/src/server.go", 42)])
        .build();
    let index = index_with(1.0, &profile);

    let key = FunctionKey::new("server", "Server", "Serve", "server.go");
    assert_eq!(index.num_functions(), 1);
    assert_eq!(index.query_line(&key, 40).value, 10);
    assert_eq!(index.query_line(&key, 42).value, 20);
    assert_eq!(key.to_string(), "server.(Server).Serve");
}

#[test]
fn test_file_table_and_trim_prefix() {
    let profile = ProfileBuilder::new()
        .sample(10, &[("main.b", "/home/ci/src/b.go", 1)])
        .sample(10, &[("main.a", "/home/ci/src/a.go", 1)])
        .sample(10, &[("main.a2", "/home/ci/src/a.go", 9)])
        .build();
    let config = IndexConfig::new().with_trim_prefix("/home/ci/");
    let mut index = Index::new(config).unwrap();
    index.add_profile(&profile).unwrap();

    assert_eq!(index.collect_file_names(), vec!["src/a.go", "src/b.go"]);
    assert!(index.has_file("src/a.go"));
    assert!(!index.has_file("/home/ci/src/a.go"));

    let mut funcs = Vec::new();
    index.inspect_file("src/a.go", |record| funcs.push(record.func.key.function.clone()));
    assert_eq!(funcs, vec!["a", "a2"]);
}

#[test]
fn test_inspect_order_and_sorted_windows() {
    let profile = ProfileBuilder::new()
        .sample(5, &[("main.z", "/src/a.go", 30)])
        .sample(50, &[("main.z", "/src/a.go", 10)])
        .sample(7, &[("main.y", "/src/b.go", 3)])
        .sample(9, &[("main.z", "/src/a.go", 20)])
        .build();
    let index = index_with(1.0, &profile);

    let mut seen = Vec::new();
    index.inspect(|record| seen.push((record.func.file_name.to_string(), record.stats.line)));
    assert_eq!(
        seen,
        vec![
            ("/src/a.go".to_string(), 10),
            ("/src/a.go".to_string(), 20),
            ("/src/a.go".to_string(), 30),
            ("/src/b.go".to_string(), 3),
        ]
    );
}

#[test]
fn test_range_of_one_line_matches_query_line() {
    let mut builder = ProfileBuilder::new();
    for (line, value) in [(3, 7), (8, 1), (9, 40), (15, 12), (16, 3), (22, 9)] {
        builder = builder.sample(value, &[("main.f", "/src/main.go", line)]);
    }
    let index = index_with(0.5, &builder.build());
    let key = main_key("f", "main.go");
    let unknown = main_key("g", "main.go");

    for key in [&key, &unknown] {
        for line in 0..25 {
            let mut ranged = Vec::new();
            index.query_line_range(key, line, line, |stats| {
                ranged.push(*stats);
                true
            });
            assert_eq!(ranged, vec![index.query_line(key, line)], "{} line {}", key, line);
        }
    }
}

#[test]
fn test_equal_values_break_ties_by_higher_line() {
    let profile = ProfileBuilder::new()
        .sample(10, &[("main.f", "/src/main.go", 1)])
        .sample(10, &[("main.f", "/src/main.go", 2)])
        .build();
    // top_n = floor(2 * 0.5) = 1, so only one of the tied lines is hot.
    let index = index_with(0.5, &profile);
    let key = main_key("f", "main.go");

    assert_eq!(index.query_line(&key, 2).local_level, 5);
    assert_eq!(index.query_line(&key, 1).local_level, 0);
}

#[test]
fn test_malformed_frames_are_skipped() {
    let profile = ProfileBuilder::new()
        .sample(
            10,
            &[
                ("main.f", "/src/main.go", -4),
                ("unqualified", "/src/main.go", 3),
                ("main.g", "/src/main.go", 5),
            ],
        )
        .build();
    let index = index_with(1.0, &profile);

    assert_eq!(index.num_functions(), 1);
    assert_eq!(index.num_points(), 1);
    // The only kept frame was not the innermost one.
    let stats = index.query_line(&main_key("g", "main.go"), 5);
    assert_eq!(stats.value, 10);
    assert_eq!(stats.flat_value, 0);
}
