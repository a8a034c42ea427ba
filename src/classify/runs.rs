/// Splits ascending column ids into maximal runs whose consecutive ids differ
/// by at most `gap`.
pub fn group_runs(ids: &[usize], gap: usize) -> Vec<Vec<usize>> {
    let mut runs: Vec<Vec<usize>> = Vec::new();
    let mut cur: Vec<usize> = Vec::new();
    for &id in ids {
        match cur.last() {
            Some(&prev) if id - prev > gap => {
                runs.push(std::mem::take(&mut cur));
                cur.push(id);
            }
            _ => cur.push(id),
        }
    }
    if !cur.is_empty() {
        runs.push(cur);
    }
    runs
}
