//! Prompt builders for the generative content service.
//!
//! Keywords only steer generation; they are never persisted.

/// Number of images requested per image generation call.
pub const IMAGE_SAMPLE_COUNT: u32 = 1;

/// Prompt asking for a short, professional project description.
pub fn description_prompt(title: &str, keywords: &str) -> String {
    format!(
        "Generate a compelling and concise description for a portfolio project with the \
         following title: \"{title}\".\n\
         The description should be professional and highlight the key features and \
         technologies used.\n\
         Include these keywords if applicable: {keywords}.\n\
         The description should be a maximum of 3 sentences."
    )
}

/// Prompt asking for an illustrative project image.
pub fn image_prompt(title: &str, keywords: &str) -> String {
    format!(
        "High-quality, professional, modern digital art representing a portfolio project \
         titled: \"{title}\". Keywords: {keywords}. Focus on abstract technological concepts \
         or clean UI design elements."
    )
}
