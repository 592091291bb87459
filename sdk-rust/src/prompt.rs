use crate::FanConfig;

/// Render the editing instruction sent alongside the source photo.
///
/// Each configuration value is interpolated exactly once and the fixed text
/// avoids every catalog value, so the rendered prompt can be searched for the
/// values it was built from.
#[must_use]
pub fn build_prompt(config: &FanConfig) -> String {
    format!(
        "Transform this image into a realistic photo of enthusiastic {sport} fans at a packed stadium.

Requirements:
1. Replace the clothes of the people with {colors} sports jerseys, scarves, caps, and face paint appropriate for the sport.
2. Make them look excited, cheering, or intense based on a {intensity} intensity level.
3. Replace the entire background with a realistic, crowded stadium scene for that sport during a {atmosphere}.
4. Ensure the lighting on the people matches the stadium environment (e.g., stadium floodlights or sunlight).
5. Maintain the identity, facial features, and pose of the original people as much as possible, but fully integrate them into the fan scene.
6. Photorealistic style with crisp detail.",
        sport = config.sport,
        colors = config.team_colors,
        intensity = config.intensity,
        atmosphere = config.atmosphere,
    )
}
