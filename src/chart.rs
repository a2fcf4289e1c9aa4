//! Plain-text horizontal bargraph.

const BAR_CHAR: char = '\u{2587}'; // ▇
const MAX_BAR_WIDTH: i64 = 40;

/// Render one bar per row, in the given order, scaled to the largest count.
/// Labels are padded to the widest one; counts are printed after each bar.
pub(crate) fn bargraph(rows: &[(String, i64)]) -> String {
    let label_width = rows
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);
    let peak = rows.iter().map(|(_, count)| *count).max().unwrap_or(0).max(1);

    let mut out = String::new();
    for (label, count) in rows {
        let mut filled = (*count).max(0) * MAX_BAR_WIDTH / peak;
        if *count > 0 && filled == 0 {
            filled = 1;
        }
        let bar: String = std::iter::repeat(BAR_CHAR).take(filled as usize).collect();
        out.push_str(&format!(
            "{:<width$} {} {}\n",
            label,
            bar,
            count,
            width = label_width
        ));
    }
    out
}
