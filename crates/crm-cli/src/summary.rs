use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crm_map::{Catalogs, MappingEditor, MappingOrigin};
use crm_model::{
    CUSTOM_FIELD_PREFIX, CustomFieldDefinition, ImportRowError, ImportSummary, TargetEntity,
};
use crm_validate::ValidationReport;

/// Rows of error detail printed before pointing at the error report.
const MAX_ERROR_ROWS: usize = 25;

pub fn print_fields(
    catalogs: &Catalogs,
    custom_fields: &[CustomFieldDefinition],
    entity: Option<TargetEntity>,
) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Entity"),
        header_cell("Field"),
        header_cell("Label"),
        header_cell("Type"),
    ]);
    apply_table_style(&mut table);
    for target in TargetEntity::ALL {
        if entity.is_some_and(|e| e != target) {
            continue;
        }
        for entry in catalogs.get(target).entries() {
            let custom = entry
                .value
                .strip_prefix(CUSTOM_FIELD_PREFIX)
                .and_then(|key| {
                    custom_fields
                        .iter()
                        .find(|d| d.entity_type == target && d.field_key == key)
                });
            let type_cell = match custom {
                Some(definition) => Cell::new(definition.field_type).fg(Color::Magenta),
                None => dim_cell("base"),
            };
            table.add_row(vec![
                entity_cell(target),
                Cell::new(&entry.value),
                Cell::new(&entry.label),
                type_cell,
            ]);
        }
    }
    println!("{table}");
}

pub fn print_mapping(editor: &MappingEditor) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Entity"),
        header_cell("Field"),
        header_cell("Source"),
    ]);
    apply_summary_table_style(&mut table);
    for mapping in editor.mappings() {
        let (entity, field) = match mapping.target_entity() {
            Some(entity) => {
                let field = match mapping.target_field() {
                    Some(field) => {
                        let label = editor.catalogs().get(entity).label_for(field);
                        Cell::new(format!("{label} ({field})"))
                    }
                    None => Cell::new("choose a field").fg(Color::Yellow),
                };
                (entity_cell(entity), field)
            }
            None => (dim_cell("skip"), dim_cell("-")),
        };
        let source = match editor.origin(&mapping.csv_column) {
            Some(MappingOrigin::Auto(source)) => dim_cell(source.description()),
            Some(MappingOrigin::Manual) => Cell::new("manual").fg(Color::Cyan),
            None => dim_cell("-"),
        };
        table.add_row(vec![Cell::new(&mapping.csv_column), entity, field, source]);
    }
    println!("{table}");

    let summary = editor.summary();
    println!(
        "{} of {} columns mapped ({} contact, {} account), {} skipped, {} incomplete",
        summary.mapped,
        summary.total,
        summary.contact,
        summary.account,
        summary.skipped,
        summary.incomplete
    );
}

pub fn print_validation(report: &ValidationReport) {
    if report.is_clean() {
        println!("All {} rows passed validation.", report.rows_checked);
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Row"),
        header_cell("Field"),
        header_cell("Value"),
        header_cell("Error"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for error in report.errors.iter().take(MAX_ERROR_ROWS) {
        table.add_row(vec![
            Cell::new(error.row),
            Cell::new(&error.field),
            Cell::new(&error.value),
            Cell::new(&error.error).fg(Color::Red),
        ]);
    }
    println!("{table}");
    if report.error_count() > MAX_ERROR_ROWS {
        println!("... and {} more", report.error_count() - MAX_ERROR_ROWS);
    }
    println!(
        "{} errors in {} of {} rows.",
        report.error_count(),
        report.rows_with_errors(),
        report.rows_checked
    );
}

pub fn print_import_summary(summary: &ImportSummary) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Rows"),
        header_cell("Created"),
        header_cell("Updated"),
        header_cell("Failed"),
        header_cell("Batches"),
        header_cell("Failed batches"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 0..6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(summary.total_rows).add_attribute(Attribute::Bold),
        count_cell(summary.created, Color::Green),
        count_cell(summary.updated, Color::Blue),
        count_cell(summary.failed, Color::Red),
        Cell::new(summary.batches),
        count_cell(summary.failed_batches, Color::Red),
    ]);
    println!("{table}");

    if summary.cancelled {
        println!("Import cancelled before all batches ran.");
    }
    for (entity, count) in &summary.registration.registered {
        println!("Registered {count} {entity} custom field(s).");
    }
    for entity in &summary.registration.failed {
        println!("Custom field registration for {entity} failed; see the log.");
    }
    print_import_errors(&summary.errors);
}

fn print_import_errors(errors: &[ImportRowError]) {
    if errors.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Row"), header_cell("Error")]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for error in errors.iter().take(MAX_ERROR_ROWS) {
        table.add_row(vec![Cell::new(error.row), Cell::new(&error.error).fg(Color::Red)]);
    }
    println!();
    println!("Row errors:");
    println!("{table}");
    if errors.len() > MAX_ERROR_ROWS {
        println!("... and {} more", errors.len() - MAX_ERROR_ROWS);
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
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

fn entity_cell(entity: TargetEntity) -> Cell {
    let color = match entity {
        TargetEntity::Contact => Color::Blue,
        TargetEntity::Account => Color::Green,
    };
    Cell::new(entity).fg(color)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
