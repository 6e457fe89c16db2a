//! Fixed display palette for notes.

use rand::Rng;

/// The palette a new note's color is drawn from when the draft carries
/// none. Soft backgrounds that keep note text readable in both themes.
pub const NOTE_PALETTE: [&str; 8] = [
    "#fef3c7", // amber
    "#dbeafe", // blue
    "#dcfce7", // green
    "#fce7f3", // pink
    "#ede9fe", // violet
    "#ffedd5", // orange
    "#e0f2fe", // sky
    "#f1f5f9", // slate
];

/// Pick a palette color at random.
pub fn random_color() -> String {
    let at = rand::rng().random_range(0..NOTE_PALETTE.len());
    NOTE_PALETTE[at].to_string()
}
