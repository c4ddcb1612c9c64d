//! Governance locks: domain separators stay centralized and the crates keep
//! their layering (kernel below search below harness).

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use kplan_kernel::proof::hash_domain::HashDomain;

#[test]
fn domain_count_is_locked() {
    assert_eq!(
        HashDomain::ALL.len(),
        5,
        "adding a hash domain changes digests; update this lock deliberately"
    );
}

#[test]
fn domain_bytes_are_unique_and_terminated() {
    let mut seen = BTreeSet::new();
    for domain in HashDomain::ALL {
        let bytes = domain.as_bytes();
        assert!(seen.insert(bytes), "duplicate bytes for {domain}");
        assert_eq!(bytes.last(), Some(&0), "{domain} is not null-terminated");
        assert!(bytes.starts_with(b"KPLAN::"), "{domain} lacks the KPLAN:: prefix");
        assert!(bytes.ends_with(b"::V1\0"), "{domain} lacks the ::V1 suffix");
    }
}

fn workspace_dir(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..").join(relative)
}

fn rust_files(dir: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    let Ok(entries) = std::fs::read_dir(dir) else {
        return out;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            out.extend(rust_files(&path));
        } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
            out.push(path);
        }
    }
    out.sort();
    out
}

/// Lines of `path` containing `needle`, ignoring `//` comments.
fn hits(path: &Path, needle: &str) -> Vec<String> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim_start().starts_with("//") && line.contains(needle))
        .map(|(i, line)| format!("  {}:{}: {}", path.display(), i + 1, line.trim()))
        .collect()
}

#[test]
fn no_raw_domain_literals_outside_hash_domain() {
    let mut violations = Vec::new();
    for dir in ["kernel/src", "search/src", "harness/src", "benchmarks/src"] {
        for file in rust_files(&workspace_dir(dir)) {
            if file.file_name().and_then(|n| n.to_str()) == Some("hash_domain.rs") {
                continue;
            }
            violations.extend(hits(&file, "b\"KPLAN::"));
        }
    }
    assert!(
        violations.is_empty(),
        "raw domain literals outside hash_domain.rs:\n{}",
        violations.join("\n")
    );
}

#[test]
fn kernel_does_not_depend_on_upper_layers() {
    let mut violations = Vec::new();
    for file in rust_files(&workspace_dir("kernel/src")) {
        violations.extend(hits(&file, "kplan_search"));
        violations.extend(hits(&file, "kplan_harness"));
    }
    for file in rust_files(&workspace_dir("search/src")) {
        violations.extend(hits(&file, "kplan_harness"));
    }
    assert!(violations.is_empty(), "layering violations:\n{}", violations.join("\n"));
}
