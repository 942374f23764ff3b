use std::path::Path;

use anyhow::{Context, Result, bail};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use tracing::info;

use term_model::{CodeIdentifier, TerminologyEntry, TypeTerm};
use term_standards::{
    ContextStore, deserialize_entry, entry_from_slicer_label, merge_descriptor_file,
};

use crate::cli::{CategoriesArgs, Cli, DecodeArgs, ImportArgs, LabelArgs, TypesArgs};

/// Build the store the way the engine starts up: built-in dictionaries
/// first, then any user directory, last file wins on name collisions.
pub fn open_store(cli: &Cli) -> Result<ContextStore> {
    let mut store = match cli.dictionaries_dir.as_deref() {
        Some(dir) => ContextStore::with_defaults_from(dir)
            .with_context(|| format!("load built-in dictionaries from {}", dir.display()))?,
        None => ContextStore::with_defaults().context("load built-in dictionaries")?,
    };
    if let Some(dir) = cli.user_dir.as_deref() {
        let loaded = store
            .load_user_directory(dir)
            .with_context(|| format!("scan user dictionary directory {}", dir.display()))?;
        info!(count = loaded.len(), "loaded user dictionaries");
    }
    Ok(store)
}

pub fn run_contexts(store: &ContextStore) -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Context"),
        header_cell("Kind"),
        header_cell("Entries"),
    ]);
    apply_table_style(&mut table);
    for name in store.terminology_names() {
        let count = store
            .terminology(name)
            .map(|c| c.categories().len())
            .unwrap_or(0);
        table.add_row(vec![
            Cell::new(name),
            Cell::new("terminology"),
            Cell::new(format!("{count} categories")),
        ]);
    }
    for name in store.anatomic_names() {
        let count = store
            .anatomic_context(name)
            .map(|c| c.regions().len())
            .unwrap_or(0);
        table.add_row(vec![
            Cell::new(name),
            Cell::new("anatomic"),
            Cell::new(format!("{count} regions")),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_categories(store: &ContextStore, args: &CategoriesArgs) -> Result<()> {
    let Some(categories) = store.find_categories(&args.terminology, &args.search) else {
        bail!("terminology context \"{}\" is not loaded", args.terminology);
    };
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Meaning"),
        header_cell("Designator"),
        header_cell("Value"),
        header_cell("Anatomy"),
        header_cell("Types"),
    ]);
    apply_table_style(&mut table);
    for category in categories {
        table.add_row(vec![
            Cell::new(&category.code.meaning),
            Cell::new(&category.code.designator),
            Cell::new(&category.code.value),
            Cell::new(if category.show_anatomy { "yes" } else { "no" }),
            Cell::new(category.types.len()),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_types(store: &ContextStore, args: &TypesArgs) -> Result<()> {
    let category_id = CodeIdentifier::new(
        args.category_designator.clone(),
        args.category_value.clone(),
        String::new(),
    );
    let Some(types) = store.find_types(&args.terminology, &category_id, &args.search) else {
        bail!(
            "category {} not found in terminology context \"{}\"",
            category_id,
            args.terminology
        );
    };
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Meaning"),
        header_cell("Designator"),
        header_cell("Value"),
        header_cell("Color"),
        header_cell("Modifiers"),
    ]);
    apply_table_style(&mut table);
    for type_term in types {
        table.add_row(vec![
            Cell::new(&type_term.code.meaning),
            Cell::new(&type_term.code.designator),
            Cell::new(&type_term.code.value),
            color_cell(type_term),
            Cell::new(type_term.modifiers.len()),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_import(store: &mut ContextStore, args: &ImportArgs) -> Result<()> {
    let summary = merge_descriptor_file(store, &args.name, &args.descriptor)
        .with_context(|| format!("import descriptor {}", args.descriptor.display()))?;
    println!(
        "Merged {} entries into context \"{}\" ({} skipped)",
        summary.merged, summary.context_name, summary.skipped
    );
    if let Some(path) = args.output.as_deref() {
        write_terminology(store, &summary.context_name, path)?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

pub fn run_decode(store: &ContextStore, args: &DecodeArgs) -> Result<()> {
    let entry = deserialize_entry(store, &args.entry).context("decode serialized entry")?;
    match entry {
        Some(entry) => print_entry(&entry),
        None => println!("No selection."),
    }
    Ok(())
}

pub fn run_label(store: &ContextStore, args: &LabelArgs) -> Result<()> {
    match entry_from_slicer_label(store, &args.terminology, &args.label) {
        Some(entry) => {
            print_entry(&entry);
            Ok(())
        }
        None => bail!(
            "no entry in \"{}\" carries the label \"{}\"",
            args.terminology,
            args.label
        ),
    }
}

fn write_terminology(store: &ContextStore, name: &str, path: &Path) -> Result<()> {
    let context = store
        .terminology(name)
        .with_context(|| format!("context \"{name}\" not registered"))?;
    let json = serde_json::to_string_pretty(context).context("serialize terminology context")?;
    std::fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

fn print_entry(entry: &TerminologyEntry) {
    let code_line = |label: &str, code: Option<&CodeIdentifier>| match code {
        Some(code) => println!("{label}: {code}"),
        None => println!("{label}: -"),
    };
    println!(
        "Terminology: {}",
        entry.terminology_context_name.as_deref().unwrap_or("-")
    );
    code_line("Category", entry.category.as_ref().map(|c| &c.code));
    code_line("Type", entry.type_term.as_ref().map(|t| &t.code));
    code_line("Type modifier", entry.type_modifier.as_ref().map(|m| &m.code));
    println!(
        "Anatomic context: {}",
        entry.anatomic_context_name.as_deref().unwrap_or("-")
    );
    code_line("Region", entry.region.as_ref().map(|r| &r.code));
    code_line(
        "Region modifier",
        entry.region_modifier.as_ref().map(|m| &m.code),
    );
    let color = entry.recommended_color();
    if color.is_valid() {
        println!("Recommended color: {color}");
    }
    println!("Valid: {}", entry.is_valid());
}

fn color_cell(type_term: &TypeTerm) -> Cell {
    if type_term.has_modifiers() {
        return Cell::new("from modifier").fg(Color::DarkGrey);
    }
    let color = type_term.display_color();
    if color.is_valid() {
        Cell::new(color.to_string())
    } else {
        Cell::new("-").fg(Color::DarkGrey)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}
