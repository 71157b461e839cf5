// Built-in demo program: a square followed by a full circle

/// Two steps each way around a square
const SQUARE: [i32; 8] = [0, 0, 90, 90, 180, 180, 270, 270];

/// Circle resolution in degrees
const CIRCLE_STEP: i32 = 20;

/// Headings of the demo path, in execution order
pub fn demo_path() -> impl Iterator<Item = i32> {
    SQUARE
        .into_iter()
        .chain((0..=360).step_by(CIRCLE_STEP as usize))
}
