//! Writing charts and printing tooltip tables.

use std::path::Path;

use chartgen::render::ChartPlan;

/// Write `svg` to `path`, creating parent directories.
///
/// # Errors
///
/// Fails when the directory or file cannot be written.
pub async fn write_svg(path: &Path, svg: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, svg).await
}

/// Tooltip text of every row, one block per row.
#[must_use]
pub fn tooltip_table(plan: &ChartPlan) -> String {
    if plan.is_empty() {
        return chartgen::render::EMPTY_PLACEHOLDER.to_owned();
    }
    plan.tooltips()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chartgen::chart::{ChartKind, DataRow, GenerationResult, SeriesKey};
    use chartgen::render::plan;

    #[test]
    fn table_lists_each_row() {
        let result = GenerationResult::series(
            vec![
                DataRow::series("Jan", [("sales", 1200.0), ("users", 40.0)]),
                DataRow::series("Feb", [("sales", 980.25), ("users", 52.0)]),
            ],
            vec![
                SeriesKey::new("sales", "#4f46e5"),
                SeriesKey::new("users", "#22c55e"),
            ],
        );

        let table = tooltip_table(&plan(ChartKind::Bar, &result));
        assert_eq!(
            table,
            "Jan\n  sales: 1,200\n  users: 40\nFeb\n  sales: 980.25\n  users: 52"
        );
    }

    #[test]
    fn empty_plan_prints_placeholder() {
        assert_eq!(tooltip_table(&ChartPlan::Empty), "No data to display.");
    }

    #[tokio::test]
    async fn writes_into_new_directory() {
        let dir = std::env::temp_dir().join(format!("chartgen-output-{}", std::process::id()));
        let path = dir.join("nested").join("chart.svg");

        write_svg(&path, "<svg/>").await.unwrap();
        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), "<svg/>");

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
