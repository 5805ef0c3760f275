use super::*;

fn depth_of(n: u64) -> u64 {
    ensure_sufficient_stack(|| if n == 0 { 0 } else { depth_of(n - 1) + 1 })
}

#[test]
fn shallow_recursion_runs_in_place() {
    assert_eq!(depth_of(16), 16);
}

#[test]
fn deep_recursion_grows_instead_of_overflowing() {
    // Far past what a 2MB test thread holds without growth.
    assert_eq!(depth_of(200_000), 200_000);
}

#[test]
fn parse_stack_passes_results_through() {
    let result: Result<u32, String> = with_parse_stack(|| Ok(7));
    assert_eq!(result, Ok(7));
}

#[test]
fn parse_stack_nests_with_per_level_growth() {
    assert_eq!(with_parse_stack(|| depth_of(50_000)), 50_000);
}
