//! First-match index search over an `i32` slice.
//!
//! Both variants return the index of the first element equal to `target`, or
//! `-1` when there is none (including for an empty slice).

pub fn index_of_builtin(values: &[i32], target: i32) -> i64 {
    values
        .iter()
        .position(|&v| v == target)
        .map_or(-1, |i| i as i64)
}

pub fn index_of_manual(values: &[i32], target: i32) -> i64 {
    let mut i = 0;
    while i < values.len() {
        if values[i] == target {
            return i as i64;
        }
        i += 1;
    }
    -1
}

/// Named search variant, so benches and the runner can iterate over both.
#[derive(Debug, Clone, Copy)]
pub struct SearchVariant {
    pub name: &'static str,
    pub run: fn(&[i32], i32) -> i64,
}

pub const SEARCH_VARIANTS: [SearchVariant; 2] = [
    SearchVariant {
        name: "builtin",
        run: index_of_builtin,
    },
    SearchVariant {
        name: "manual",
        run: index_of_manual,
    },
];

/// Input for one search measurement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCase {
    pub label: &'static str,
    pub values: Vec<i32>,
    pub target: i32,
}

/// Cases measured by the search benchmark: a tiny miss, an early hit in a
/// longer slice, and a full-length miss.
pub fn search_cases() -> Vec<SearchCase> {
    vec![
        SearchCase {
            label: "3/miss",
            values: vec![1, 2, 3],
            target: 4,
        },
        SearchCase {
            label: "100/hit@4",
            values: (0..100).collect(),
            target: 4,
        },
        SearchCase {
            label: "100/miss",
            values: (0..100).collect(),
            target: 101,
        },
    ]
}
