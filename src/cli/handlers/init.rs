use std::fs;
use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::config_io;

const CONFIG_TOML_TEMPLATE: &str = r##"# ticklist configuration
# Uncomment and edit to override defaults.

[storage]
# file = "{store}"
# key = "tasks"

[ui]
# default_filter = "all"          # "all", "complete" or "incomplete"
# confirm_delete = false
# show_key_hints = true
#
# [ui.colors]
# background = "#0C001B"
# text = "#B0AAFF"
# text_bright = "#FFFFFF"
# highlight = "#FB4196"
# dim = "#7D78BF"
# red = "#FF4444"
# green = "#44FF88"
# selection_bg = "#3D1438"
"##;

/// The template with the default store location filled in as a hint
fn render_config_toml(store: &Path) -> String {
    CONFIG_TOML_TEMPLATE.replace("{store}", &store.display().to_string())
}

pub fn cmd_init(args: &InitArgs, config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if config_path.exists() && !args.force {
        return Err(format!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        )
        .into());
    }

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = render_config_toml(&config_io::default_store_path());
    fs::write(config_path, content)?;

    println!("Wrote {}", config_path.display());
    Ok(())
}
