mod common;

use std::fs;

use seedcurves::{ArraySegmentConfig, ArraySegmenter, DirectoryBatchDriver, TextLogParser};
use tempfile::tempdir;

use common::{snapshot, write_f64_npy};

#[test]
fn array_counts_follow_division_law() {
    for k in 1..=7usize {
        let segmenter = ArraySegmenter::new(ArraySegmentConfig::new(k)).unwrap();
        for len in 0..=30usize {
            let values: Vec<f64> = (0..len).map(|idx| idx as f64 * 0.5).collect();
            let result = segmenter.segment("Law-v0", &values);

            assert_eq!(result.seed_count(), len / k);
            assert_eq!(result.record_count(), k * (len / k));
            assert_eq!(result.discarded, len % k);

            let emitted: Vec<f64> = result.seeds.iter().flatten().map(|r| r.value).collect();
            assert_eq!(emitted, values[..k * (len / k)].to_vec());
            for run in &result.seeds {
                let steps: Vec<u64> = run.iter().map(|r| r.step).collect();
                assert_eq!(steps, (0..k as u64).collect::<Vec<_>>());
                for record in run {
                    assert_eq!(record.wall_time, Some(record.step as f64 * 2.0));
                }
            }
        }
    }
}

#[test]
fn log_wall_time_is_non_decreasing_per_task() {
    let mut lines = vec!["03/04/2024 23:59:50 start".to_string()];
    for epoch in 0..20u32 {
        let seconds = 50 + epoch * 3;
        let minute = 59 + seconds / 60;
        let (hour, day, minute) = if minute >= 60 {
            (0, 4, minute - 60)
        } else {
            (23, 3, minute)
        };
        let second = seconds % 60;
        let task = if epoch % 2 == 0 { "Even-v0" } else { "Odd-v0" };
        lines.push(format!(
            "{day:02}/04/2024 {hour:02}:{minute:02}:{second:02} [INFO] Epoch {epoch} | EnvName: {task} x AverageReturn: {epoch}.5"
        ));
    }

    let records = TextLogParser::default().parse_lines(&lines).unwrap();
    assert_eq!(records.task_count(), 2);
    for (_, group) in records.iter() {
        let times: Vec<f64> = group.iter().map(|r| r.wall_time.unwrap()).collect();
        assert!(times.windows(2).all(|pair| pair[0] <= pair[1]), "{times:?}");
        let steps: Vec<u64> = group.iter().map(|r| r.step).collect();
        assert!(steps.windows(2).all(|pair| pair[0] < pair[1]));
    }
    let last = records.get("Odd-v0").unwrap().last().unwrap();
    assert_eq!(last.wall_time, Some(57.0));
}

#[test]
fn reruns_produce_byte_identical_outputs() {
    let temp = tempdir().unwrap();
    let input = temp.path().join("runs");
    let output = temp.path().join("out");
    fs::create_dir_all(&input).unwrap();
    write_f64_npy(
        &input.join("Foo-v0_AverageReturn.npy"),
        &[0.1, 0.2, 0.30000000000000004, 1e-7, 12345.678, -3.0, 7.0],
    );
    let log = temp.path().join("seed_0.log");
    fs::write(
        &log,
        "01/01/2024 00:00:00 [INFO] Epoch 0 | EnvName: Bar-v0 x AverageReturn: 0.125\n\
         01/01/2024 00:00:03 [INFO] Epoch 1 | EnvName: Bar-v0 x AverageReturn: 0.250\n",
    )
    .unwrap();

    let driver = DirectoryBatchDriver::new(ArraySegmentConfig::new(3));
    driver.convert_array_dir(&input, &output).unwrap();
    driver.convert_log_file(&log, &output).unwrap();
    let first = snapshot(&output);

    driver.convert_array_dir(&input, &output).unwrap();
    driver.convert_log_file(&log, &output).unwrap();
    let second = snapshot(&output);

    assert_eq!(first.len(), 3);
    assert_eq!(first, second);
}

#[test]
fn written_values_round_trip_exactly() {
    let temp = tempdir().unwrap();
    let input = temp.path().join("runs");
    let output = temp.path().join("out");
    fs::create_dir_all(&input).unwrap();
    let values = [0.1, 1.0 / 3.0, -2.5e-12, 9.87654321e15];
    write_f64_npy(&input.join("Exact-v0_AverageReturn.npy"), &values);

    DirectoryBatchDriver::new(ArraySegmentConfig::new(4))
        .convert_array_dir(&input, &output)
        .unwrap();

    let parsed: Vec<f64> = common::read_rows(&output.join("Exact_v0_seed0.csv"))
        .into_iter()
        .map(|(_, _, value)| value)
        .collect();
    assert_eq!(parsed, values.to_vec());
}
