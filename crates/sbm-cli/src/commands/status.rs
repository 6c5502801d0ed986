use std::path::Path;

use crate::view;

pub fn run(save: &Path) -> Result<(), String> {
    let run = super::load_saved(save)?;
    println!("{}", view::status(&run));
    if !run.tracks.is_empty() {
        println!("\n{}", view::tracks_table(&run));
    }
    Ok(())
}
