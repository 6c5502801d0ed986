use comfy_table::{ContentArrangement, Table};

use sbm_core::tables::{
    METHOD_TABLE, MIX_CURSES, MUTATIONS, OFFSET_TABLE, RUN_TAGS, TARGET_CURSES, TRACK_TYPES,
    breakpoint_span,
};

pub fn run() -> Result<(), String> {
    let mut table = new_table(vec!["Roll", "Track Type"]);
    for entry in &TRACK_TYPES {
        table.add_row(vec![span(entry.min, entry.max), entry.value.to_string()]);
    }
    println!("Track Types\n{table}\n");

    let mut table = new_table(vec!["Roll", "Mutation"]);
    for entry in &MUTATIONS {
        let (low, high) = breakpoint_span(&MUTATIONS, entry);
        table.add_row(vec![span(low, high), entry.text.to_string()]);
    }
    println!("Mutations\n{table}\n");

    let mut table = new_table(vec!["Roll", "Target Curse"]);
    for entry in &TARGET_CURSES {
        let (low, high) = breakpoint_span(&TARGET_CURSES, entry);
        table.add_row(vec![span(low, high), entry.text.to_string()]);
    }
    println!("Target Curses\n{table}\n");

    let mut table = new_table(vec!["Roll", "Mix Curse"]);
    for entry in &MIX_CURSES {
        let (low, high) = breakpoint_span(&MIX_CURSES, entry);
        table.add_row(vec![span(low, high), entry.text.to_string()]);
    }
    println!("Mix Curses\n{table}\n");

    let mut table = new_table(vec!["Roll", "Curse Target", "Roll", "Offset"]);
    for (i, method) in METHOD_TABLE.iter().enumerate() {
        let offset = OFFSET_TABLE.get(i).map_or((String::new(), String::new()), |o| {
            (span(o.min, o.max), format!("{:+}", o.value))
        });
        table.add_row(vec![
            span(method.min, method.max),
            method.value.to_string(),
            offset.0,
            offset.1,
        ]);
    }
    println!("Curse Targeting\n{table}\n");

    let mut table = new_table(vec!["Tag", "Meaning"]);
    for (tag, desc) in &RUN_TAGS {
        table.add_row(vec![tag.to_string(), desc.to_string()]);
    }
    println!("Run Tags\n{table}");

    Ok(())
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

fn span(low: u32, high: u32) -> String {
    if low == high {
        low.to_string()
    } else {
        format!("{low}-{high}")
    }
}
