//! `tutor rubric`: show the configured rubric.

use anyhow::Result;
use comfy_table::{presets, Cell, ContentArrangement, Table};
use console::style;
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Config, Rubric, RubricDimension};

#[derive(Debug, Serialize)]
pub struct RubricOutput {
    pub target: u8,
    pub dimensions: Vec<RubricDimension>,
}

impl From<&Rubric> for RubricOutput {
    fn from(rubric: &Rubric) -> Self {
        Self {
            target: rubric.target(),
            dimensions: rubric.dimensions().to_vec(),
        }
    }
}

impl CommandOutput for RubricOutput {
    fn to_human(&self) -> String {
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL_CONDENSED)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(["DIMENSION", "KEY", "1", "2", "3", "4"]);

        for dimension in &self.dimensions {
            let mut row = vec![Cell::new(&dimension.name), Cell::new(&dimension.key)];
            row.extend(dimension.levels.iter().map(Cell::new));
            table.add_row(row);
        }

        format!(
            "{} {} dimension(s), target score {}\n{table}",
            style("Rubric:").bold(),
            self.dimensions.len(),
            style(self.target).green().bold()
        )
    }
}

pub fn execute(config: &Config, json: bool) -> Result<()> {
    output(&RubricOutput::from(&config.rubric), json);
    Ok(())
}
