use std::time::Instant;

const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const FRAME_MS: u128 = 80;

/// Spinner glyph for something that started at `since`.
pub fn spinner_frame(since: Option<Instant>) -> &'static str {
    let elapsed = since.map(|t| t.elapsed().as_millis()).unwrap_or(0);
    FRAMES[(elapsed / FRAME_MS) as usize % FRAMES.len()]
}
