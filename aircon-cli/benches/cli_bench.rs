use std::fmt::Write as _;
use std::fs;
use std::process::{Command, Stdio};

use assert_cmd::prelude::*;
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use tempfile::TempDir;

fn write_schema(dir: &TempDir, features: usize) {
    let mut yaml = String::from("sources: [{ id: remote }]\nfeatures:\n");
    for f in 0..features {
        let _ = write!(
            yaml,
            "  - name: Feature{f}\n    source: remote\n    configs:\n      - {{ key: F{f}_ON, type: boolean }}\n      - {{ key: F{f}_FOLLOW, type: boolean, default: {{ config: F{f}_ON }} }}\n      - {{ key: F{f}_COUNT, type: integer, min: 0, max: 9 }}\n"
        );
    }
    fs::write(dir.path().join("schema.yaml"), yaml).expect("failed to write schema");
}

fn aircon(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("aircon").expect("failed to locate aircon binary");
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    cmd
}

fn bench_check(c: &mut Criterion) {
    let dir = TempDir::new().expect("failed to create temp dir");
    write_schema(&dir, 25);

    c.bench_function("cli_check", |b| {
        b.iter(|| {
            let status = aircon(&dir)
                .args(["--quiet", "check", "schema.yaml"])
                .status()
                .expect("failed to run aircon check");
            assert!(status.success());
        });
    });
}

fn bench_generate(c: &mut Criterion) {
    c.bench_function("cli_generate", |b| {
        b.iter_batched(
            || {
                let dir = TempDir::new().expect("failed to create temp dir");
                write_schema(&dir, 25);
                dir
            },
            |dir| {
                let status = aircon(&dir)
                    .args(["--quiet", "generate", "schema.yaml", "-o", "gen"])
                    .status()
                    .expect("failed to run aircon generate");
                assert!(status.success());
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_check, bench_generate);
criterion_main!(benches);
