use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use fmri_cli::pipeline::{ConditionsReport, DesignEntry, RunResult};
use fmri_design::ColumnSource;

/// Prints the condition column and final conditions of an events file.
pub fn print_conditions(report: &ConditionsReport) {
    println!("Events: {}", report.events.display());
    let source = match report.column.source {
        ColumnSource::Candidate => "standard name",
        ColumnSource::FirstNonNumeric => "first non-numeric column",
    };
    println!("Condition column: {} ({source})", report.column.name);
    if report.split {
        println!("Repeated CS-_first_half trials split into first/others");
    }

    let mut table = Table::new();
    table.set_header(vec![header_cell("Condition"), header_cell("Trials")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let mut total = 0usize;
    for (name, trials) in &report.conditions {
        total += trials;
        table.add_row(vec![condition_cell(name), count_cell(*trials)]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
}

/// Prints the designs of a run to stderr, leaving stdout to the JSON.
pub fn print_run_summary(result: &RunResult, output: Option<&Path>) {
    eprintln!("Scans: {}", result.inputs.bold.display());
    if let Some(tr) = result.inputs.repetition_time {
        eprintln!("Repetition time: {tr} s");
    }
    if let Some(path) = output {
        eprintln!("Design JSON: {}", path.display());
    }

    match result.entries.as_slice() {
        [entry] if entry.trial_id.is_none() => eprintln!("{}", condition_table(entry)),
        [entry] => {
            eprintln!("Trial: {}", entry.trial_id.unwrap_or_default());
            eprintln!("{}", condition_table(entry));
        }
        entries => eprintln!("{}", trial_table(entries)),
    }
}

fn condition_table(entry: &DesignEntry) -> Table {
    let design = &entry.built.design;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Condition"),
        header_cell("Events"),
        header_cell("First onset"),
        header_cell("Last onset"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for (name, onsets) in design.conditions().iter().zip(design.onsets()) {
        table.add_row(vec![
            condition_cell(name),
            count_cell(onsets.len()),
            onset_cell(onsets.first()),
            onset_cell(onsets.last()),
        ]);
    }
    table.add_row(vec![
        Cell::new("Regressors")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(design.regressor_names().len()).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    table.add_row(vec![
        dim_cell("Motion file"),
        Cell::new(entry.built.motion_file.display()),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    table
}

fn trial_table(entries: &[DesignEntry]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Trial ID"),
        header_cell("Onset"),
        header_cell("Others"),
        header_cell("Motion file"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for entry in entries {
        let design = &entry.built.design;
        let trial = design.condition(fmri_model::labels::LSS_TRIAL);
        let others = design.condition(fmri_model::labels::LSS_OTHERS);
        table.add_row(vec![
            entry
                .trial_id
                .map_or_else(|| dim_cell("-"), |id| Cell::new(id).fg(Color::Blue)),
            onset_cell(trial.as_ref().and_then(|c| c.onsets.first())),
            count_cell(others.map_or(0, |c| c.onsets.len())),
            Cell::new(entry.built.motion_file.display()),
        ]);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn condition_cell(name: &str) -> Cell {
    if name.is_empty() {
        dim_cell("(blank)")
    } else {
        Cell::new(name)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold)
    }
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count)
    } else {
        Cell::new(count).fg(Color::Yellow)
    }
}

fn onset_cell(onset: Option<&f64>) -> Cell {
    match onset {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
