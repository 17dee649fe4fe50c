//! Prompt assembly for generated header artwork.

/// How much of a record's body feeds the prompt.
const PREVIEW_CHARS: usize = 2000;

/// Build the image-service prompt for one catalog record.
pub fn build_artwork_prompt(content_type: &str, title: &str, body: &str) -> String {
    let preview: String = body.chars().take(PREVIEW_CHARS).collect();
    let themes = extract_themes(&preview);
    let style = style_for(content_type);

    format!(
        "Create a visually striking artwork for: \"{}\"\n\n\
         Key themes: {}\n\n\
         Style requirements: {}\n\n\
         The image should work as a header/hero image for a digital \
         article. High quality, professional editorial illustration. \
         No text in the image.",
        title, themes, style
    )
}

fn style_for(content_type: &str) -> &'static str {
    match content_type {
        "brief" => {
            "Abstract digital art with flowing data streams, warm sunrise \
             colors (gold, orange, deep blue), interconnected nodes, sleek \
             futuristic aesthetic, editorial illustration style"
        }
        "audio" => {
            "Sound wave visualization merging with abstract imagery, \
             dynamic flowing forms, musical energy"
        }
        "debate" => {
            "Two contrasting perspectives visualized abstractly, balanced \
             composition, intellectual atmosphere, discourse imagery"
        }
        _ => {
            "Artistic illustration capturing the narrative essence, rich \
             colors, atmospheric lighting, editorial quality"
        }
    }
}

/// Pull a handful of leading sentences out of the body as theme hints.
fn extract_themes(body: &str) -> String {
    let key_phrases: Vec<String> = body
        .split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| s.len() > 20)
        .take(5)
        .map(|s| s.chars().take(100).collect())
        .collect();

    if key_phrases.is_empty() {
        "general knowledge and insights".to_string()
    } else {
        key_phrases.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_title_and_themes() {
        let prompt = build_artwork_prompt(
            "text",
            "The Lighthouse Keeper",
            "A storm rolled in over the northern coast that evening. \
             The keeper climbed the spiral stairs one more time.",
        );

        assert!(prompt.contains("\"The Lighthouse Keeper\""));
        assert!(prompt.contains("A storm rolled in over the northern coast"));
        assert!(prompt.contains("No text in the image"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let a = build_artwork_prompt("brief", "Morning Brief", "Short body text goes here today.");
        let b = build_artwork_prompt("brief", "Morning Brief", "Short body text goes here today.");
        assert_eq!(a, b);
    }

    #[test]
    fn test_style_varies_by_type() {
        let brief = build_artwork_prompt("brief", "T", "");
        let debate = build_artwork_prompt("debate", "T", "");
        let unknown = build_artwork_prompt("mystery", "T", "");

        assert!(brief.contains("data streams"));
        assert!(debate.contains("contrasting perspectives"));
        assert!(unknown.contains("narrative essence"));
    }

    #[test]
    fn test_empty_body_falls_back_to_generic_themes() {
        let prompt = build_artwork_prompt("text", "T", "");
        assert!(prompt.contains("general knowledge and insights"));
    }
}
