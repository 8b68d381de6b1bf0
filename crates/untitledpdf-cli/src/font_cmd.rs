use untitledpdf_core::{base_font_name, map_font, standard_font_name};

use crate::cli::TextFormat;
use crate::shared::{hint_str, print_json, slant_str, weight_str};

pub fn run(font_name: &str, base_name: Option<&str>, format: &TextFormat) -> Result<(), i32> {
    let base_name = base_name.unwrap_or_else(|| base_font_name(font_name));
    let description = map_font(base_name, font_name);
    let standard = standard_font_name(&description);

    match format {
        TextFormat::Text => {
            println!("family: {}", description.family);
            println!("hint: {}", hint_str(description.hint));
            println!("weight: {}", weight_str(description.weight));
            println!("slant: {}", slant_str(description.slant));
            println!("standard: {standard}");
            Ok(())
        }
        TextFormat::Json => print_json(&serde_json::json!({
            "font_name": font_name,
            "base_name": base_name,
            "description": description,
            "standard_font": standard,
        })),
    }
}
