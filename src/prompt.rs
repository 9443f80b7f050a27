use crate::error::{GenAiError, Result};
use std::collections::HashMap;

/// Greeting card prompt used by the card generator flow.
pub const GREETING_CARD_TEMPLATE: &str = "\
Generate a greeting card illustration based on the following:
Reason: {card_reason}
Tone: {tone}
Image: {image_idea}
Color Palette: {colors}
Style: {card_style}

Remember:
- The output should be a single, high-quality illustration suitable for a greeting card.
- No text should be included in the illustration unless specified.
";

/// Moodboard prompt used by the fashion moodboard flow.
pub const MOODBOARD_TEMPLATE: &str = "\
Generate a professional fashion design moodboard based on the following:
Title/Theme: {title}
Keywords/Vibes: {keywords}
Target Audience: {target_audience}
Layout notes:
* Layout: 2x6 grid with a column for color swatches on the side
* There must be a column of color swatches on the left side
* Include images reflecting the overall aesthetic and keywords, with an emphasis on incorporating objects, trims, textures, patterns, and other decorative elements.
* Color palette should complement the theme and vibes.
* At least three objects. These objects must be relevant to the prompt and be in active use.
* At least two images of scenery or landscape.
* Include diverse fashion concepts relevant to the target audience.
* Include fabric textures as swatches on the grid.
Color Swatches (Column 1):
* {color_1}
* {color_2}
* {color_3}
* {color_4}
* {color_5}
* {color_6}
Remember: {remember}
";

/// Logo prompt used by the business logo flow.
pub const LOGO_TEMPLATE: &str = "\
Generate a professional logo design based on the following specifications:

Business Name: {business_name}
Business Description: {business_description}

--- DESIGN BRIEF ---

Logo Style: {style}
Visual Concept: {image_idea}

--- AESTHETICS ---

Core Aesthetics: minimalist, vector art, 2D, flat design, professional, clean
Color Palette: {colors}
";

/// A prompt template with `{name}` placeholders.
///
/// `{{` and `}}` render as literal braces. Rendering fails on the first
/// placeholder that has no bound value; unused field keys are ignored.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    text: String,
}

impl PromptTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Placeholder names in order of first appearance.
    pub fn placeholders(&self) -> Vec<String> {
        let mut names = Vec::new();
        let mut chars = self.text.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for inner in chars.by_ref() {
                        if inner == '}' {
                            closed = true;
                            break;
                        }
                        name.push(inner);
                    }
                    // An unterminated placeholder is not a field; render
                    // rejects the template outright.
                    if closed && !names.contains(&name) {
                        names.push(name);
                    }
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                }
                _ => {}
            }
        }

        names
    }

    pub fn render(&self, fields: &HashMap<String, String>) -> Result<String> {
        let mut output = String::with_capacity(self.text.len());
        let mut chars = self.text.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    output.push('{');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for inner in chars.by_ref() {
                        if inner == '}' {
                            closed = true;
                            break;
                        }
                        name.push(inner);
                    }
                    if !closed {
                        return Err(GenAiError::RequestError(format!(
                            "Unclosed placeholder '{{{}' in template",
                            name
                        )));
                    }
                    match fields.get(&name) {
                        Some(value) => output.push_str(value),
                        None => return Err(GenAiError::TemplateError(name)),
                    }
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    output.push('}');
                }
                other => output.push(other),
            }
        }

        Ok(output)
    }
}
