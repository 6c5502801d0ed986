use std::path::Path;

use sbm_core::run::log::{export_markdown, export_text};
use sbm_store::export_run;

pub fn run(save: &Path, format: &str, output: Option<&Path>) -> Result<(), String> {
    let run = super::load_saved(save)?;

    let content = match format {
        "json" => {
            let bytes = export_run(&run).map_err(|e| e.to_string())?;
            String::from_utf8(bytes).map_err(|e| e.to_string())?
        }
        "text" | "txt" => export_text(&run.log),
        "markdown" | "md" => export_markdown(&run.log),
        _ => {
            return Err(format!(
                "unsupported format: \"{format}\". Use: json, text, markdown"
            ));
        }
    };

    if let Some(path) = output {
        std::fs::write(path, &content)
            .map_err(|e| format!("cannot write to {}: {e}", path.display()))?;
        println!("  Exported to {}", path.display());
    } else {
        print!("{content}");
    }

    Ok(())
}
